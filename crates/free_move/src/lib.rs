//! # Free Move
//!
//! Sub-tile character movement and collision for tile-grid maps.
//!
//! ## Features
//!
//! - **Free Movement**: Characters travel fractions of a tile per frame
//! - **Axis-Separated Collision**: Moves are clamped per axis, so walls slide
//! - **8-Way Facing**: Diagonal facing with hysteresis against flicker
//! - **Spatial Index**: Uniform grid broad phase kept in sync every frame
//! - **Touch Events**: Walking into an event starts it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use free_move::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = MapScene::new(FreeMoveConfig::default());
//!     scene.block_tile(4, 2);
//!     let player = scene.spawn(CharacterKind::Player, Vec2::new(2.0, 2.0))?;
//!
//!     if let Some(character) = scene.character_mut(player) {
//!         character.move_straight(Direction::Right);
//!     }
//!     for _ in 0..16 {
//!         scene.update_frame()?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;

pub mod character;
pub mod physics;
pub mod spatial;
pub mod movement;
pub mod scene;

#[cfg(test)]
mod tests;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        character::{Character, CharacterFlags, CharacterId, CharacterKind, Direction, EventState, EventTrigger},
        config::{Config, ConfigError, FreeMoveConfig},
        foundation::math::Vec2,
        movement::{CharacterMovementController, FrameReport, MovementError},
        physics::Hitbox,
        scene::{MapScene, Party, SceneError},
        spatial::{GridSpatialIndex, Obstacle, SpatialError, SpatialQuery},
    };
}
