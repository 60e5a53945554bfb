//! Free movement
//!
//! Per-frame auto-move: each character with a pending displacement walks a
//! constant distance toward it, collision shortens the step per axis, and the
//! spatial index is told about every actual position change.

mod auto_move;
pub mod bridge;
mod controller;

use thiserror::Error;

use crate::spatial::SpatialError;

pub use auto_move::AutoMove;
pub use controller::{frame_displacement, CharacterMovementController, FrameReport};

/// Movement errors
///
/// Any of these leaves the spatial index out of step with character
/// positions, so callers should treat them as fatal for the frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MovementError {
    /// The spatial index rejected an update
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}
