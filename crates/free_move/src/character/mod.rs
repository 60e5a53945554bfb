//! Characters that move on the map
//!
//! A character is a player, an event (NPC), a follower or a vehicle. All of
//! them share one [`Character`] struct; what differs between variants is
//! expressed by [`CharacterKind`] and [`CharacterFlags`] instead of type tests.

mod model;
mod direction;
mod id;

pub use model::{Character, CharacterFlags, CharacterKind, EventState, EventTrigger, TouchContext};
pub use direction::{resolve_facing, Direction};
pub use id::CharacterId;
