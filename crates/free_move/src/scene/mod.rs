//! Map scene
//!
//! Owns the characters on a map, the movement controller (and through it the
//! spatial index) and the party, and runs the per-frame loop.

mod map_scene;
mod party;

use thiserror::Error;

use crate::character::CharacterId;
use crate::movement::MovementError;
use crate::spatial::SpatialError;

pub use map_scene::MapScene;
pub use party::Party;

/// Scene-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No character with this id on the map
    #[error("Unknown character {0}")]
    UnknownCharacter(CharacterId),

    /// A frame update failed
    #[error("Movement error: {0}")]
    Movement(#[from] MovementError),

    /// Spatial index rejected a registration
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}
