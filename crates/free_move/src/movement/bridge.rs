//! Spatial index notification
//!
//! Keeps the index in step with character positions. Called once per frame
//! per character, and only when the character actually moved.

use crate::character::Character;
use crate::spatial::SpatialQuery;

use super::MovementError;

/// Re-index `character` after it moved
///
/// Without an index (still initializing) the update is skipped and `false`
/// is returned; the index will be stale until it's attached and refilled.
pub fn notify_moved(
    index: Option<&mut (dyn SpatialQuery + 'static)>,
    character: &Character,
) -> Result<bool, MovementError> {
    let Some(index) = index else {
        log::debug!("No spatial index yet, skipping update for {}", character.id());
        return Ok(false);
    };
    index.update_entity(character.id(), character.hitbox())?;
    log::debug!(
        "Spatial index updated for {} at ({:.4}, {:.4})",
        character.id(),
        character.position().x,
        character.position().y
    );
    Ok(true)
}
