//! Map scene and frame loop

use crate::character::{Character, CharacterId, CharacterKind, TouchContext};
use crate::config::FreeMoveConfig;
use crate::foundation::math::Vec2;
use crate::movement::{CharacterMovementController, FrameReport};
use crate::physics::Hitbox;
use crate::spatial::{GridSpatialIndex, SpatialQuery};

use super::party::Party;
use super::SceneError;

/// Characters on one map plus the services they move through
///
/// Characters update in insertion order. Each one's index update lands before
/// the next one queries, so whoever moves first in a frame can block whoever
/// moves later.
pub struct MapScene {
    config: FreeMoveConfig,
    controller: CharacterMovementController,
    characters: Vec<Character>,
    party: Party,
    event_running: bool,
}

impl MapScene {
    /// Scene with a grid index sized from `config`
    pub fn new(config: FreeMoveConfig) -> Self {
        let index = GridSpatialIndex::new(config.cell_size());
        Self::with_controller(config, CharacterMovementController::new(Box::new(index)))
    }

    /// Scene around an existing controller
    pub fn with_controller(config: FreeMoveConfig, controller: CharacterMovementController) -> Self {
        Self {
            config,
            controller,
            characters: Vec::new(),
            party: Party::new(),
            event_running: false,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &FreeMoveConfig {
        &self.config
    }

    /// Movement controller
    pub fn controller(&self) -> &CharacterMovementController {
        &self.controller
    }

    /// Create a character from the scene's config and add it
    pub fn spawn(&mut self, kind: CharacterKind, position: Vec2) -> Result<CharacterId, SceneError> {
        let character = Character::new(kind, position, &self.config);
        self.add_character(character)
    }

    /// Add a character and register its box
    pub fn add_character(&mut self, character: Character) -> Result<CharacterId, SceneError> {
        let id = character.id();
        if let Some(index) = self.controller.spatial_mut() {
            index.insert(id, character.hitbox())?;
        }
        log::debug!("Added {:?} {} at {:?}", character.kind(), id, character.position());
        self.characters.push(character);
        Ok(id)
    }

    /// Remove a character and unregister its box
    pub fn remove_character(&mut self, id: CharacterId) -> Result<Character, SceneError> {
        let slot = self.slot_of(id)?;
        if let Some(index) = self.controller.spatial_mut() {
            index.remove(id);
        }
        Ok(self.characters.remove(slot))
    }

    /// Look up a character
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    /// Look up a character for commands
    ///
    /// Changing the position through this reference bypasses the index; use
    /// [`Self::teleport`] for that.
    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id() == id)
    }

    /// All characters in update order
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// First player character, if any
    pub fn player_id(&self) -> Option<CharacterId> {
        self.characters.iter().find(|c| c.is_player()).map(Character::id)
    }

    /// Party statistics
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// An event script is running
    pub fn is_event_running(&self) -> bool {
        self.event_running
    }

    /// Set by the script runner when a script starts or finishes
    pub fn set_event_running(&mut self, running: bool) {
        self.event_running = running;
    }

    /// Make a tile impassable
    pub fn block_tile(&mut self, x: i32, y: i32) {
        self.add_obstacle(Hitbox::tile(x, y));
    }

    /// Add static geometry
    pub fn add_obstacle(&mut self, hitbox: Hitbox) {
        match self.controller.spatial_mut() {
            Some(index) => index.add_static(hitbox),
            None => log::warn!("No spatial index, dropping obstacle {hitbox:?}"),
        }
    }

    /// Move a character instantly, cancelling its auto-move
    pub fn teleport(&mut self, id: CharacterId, position: Vec2) -> Result<(), SceneError> {
        let slot = self.slot_of(id)?;
        let character = &mut self.characters[slot];
        character.set_position(position);
        character.reset_auto_movement();
        let hitbox = character.hitbox();
        if let Some(index) = self.controller.spatial_mut() {
            index.update_entity(id, hitbox)?;
        }
        Ok(())
    }

    /// Install a new spatial index and register every character in it
    pub fn attach_index(&mut self, index: Box<dyn SpatialQuery>) -> Result<(), SceneError> {
        if self.controller.attach_index(index).is_some() {
            log::debug!("Replaced spatial index");
        }
        if let Some(index) = self.controller.spatial_mut() {
            for character in &self.characters {
                if index.get_hitbox(character.id()).is_some() {
                    index.update_entity(character.id(), character.hitbox())?;
                } else {
                    index.insert(character.id(), character.hitbox())?;
                }
            }
        }
        Ok(())
    }

    /// Events flagged as starting since the last call; clears the flags
    pub fn take_starting_events(&mut self) -> Vec<CharacterId> {
        let mut started = Vec::new();
        for character in &mut self.characters {
            let id = character.id();
            if let CharacterKind::Event(event) = character.kind_mut() {
                if event.starting {
                    event.starting = false;
                    started.push(id);
                }
            }
        }
        started
    }

    /// Advance every character by one frame
    pub fn update_frame(&mut self) -> Result<Vec<FrameReport>, SceneError> {
        let mut reports = Vec::with_capacity(self.characters.len());
        for slot in 0..self.characters.len() {
            let report = self.controller.update(&mut self.characters[slot])?;

            if self.characters[slot].is_player() {
                let (dx, dy) = report.applied;
                if dx != 0.0 || dy != 0.0 {
                    self.party.increase_steps(dx.abs() + dy.abs());
                }
            }

            let ctx = TouchContext {
                event_running: self.event_running,
            };
            for other in &report.touched {
                let Some(other_slot) = self.characters.iter().position(|c| c.id() == *other) else {
                    continue;
                };
                let Some((mover, touched)) = pair_mut(&mut self.characters, slot, other_slot) else {
                    continue;
                };
                if mover.check_event_trigger_touch(touched, &ctx) {
                    log::info!("{} touched event {}", mover.id(), touched.id());
                }
            }

            reports.push(report);
        }
        Ok(reports)
    }

    fn slot_of(&self, id: CharacterId) -> Result<usize, SceneError> {
        self.characters
            .iter()
            .position(|c| c.id() == id)
            .ok_or(SceneError::UnknownCharacter(id))
    }
}

/// Two distinct elements of a slice, mutably; `None` if `a == b` or out of range
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a.max(b) >= items.len() {
        return None;
    }
    if a < b {
        let (left, right) = items.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}
