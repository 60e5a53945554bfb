//! Physics module for hitboxes and collision truncation
//!
//! There is no integration step here: characters move at a constant
//! per-frame distance and collision only shortens that distance.

pub mod collision;
pub mod hitbox;

pub use collision::{truncate_axis, Axis, AxisTruncation, COLLISION_EPSILON};
pub use hitbox::Hitbox;
