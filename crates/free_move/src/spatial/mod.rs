//! Spatial partitioning data structures
//!
//! Provides the obstacle lookup used by collision truncation and the
//! re-index hook called whenever a character moves.

pub mod spatial_query;
mod grid;

pub use grid::GridSpatialIndex;
pub use spatial_query::{Obstacle, SpatialError, SpatialQuery};
