//! Abstract spatial query interface
//!
//! Collision truncation only needs two things from a spatial structure: the
//! boxes overlapping a query band, and a way to re-index a character after it
//! moves. The storage behind it (grid, quadtree, ...) is an implementation
//! detail of whoever provides the index.

use thiserror::Error;

use crate::character::CharacterId;
use crate::physics::Hitbox;

/// A box that can block movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Character the box belongs to; `None` for static map geometry
    pub owner: Option<CharacterId>,
    /// Collision box
    pub hitbox: Hitbox,
}

impl Obstacle {
    /// Box owned by a character
    pub fn character(owner: CharacterId, hitbox: Hitbox) -> Self {
        Self {
            owner: Some(owner),
            hitbox,
        }
    }

    /// Static map geometry
    pub fn fixed(hitbox: Hitbox) -> Self {
        Self { owner: None, hitbox }
    }
}

/// Spatial index errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    /// Update or lookup for an id that was never inserted
    #[error("Character {0} is not in the spatial index")]
    UnknownEntity(CharacterId),

    /// Insert for an id that is already present
    #[error("Character {0} is already in the spatial index")]
    DuplicateEntity(CharacterId),
}

/// Interface between movement code and a spatial structure
pub trait SpatialQuery: Send + Sync {
    /// Register a character's box
    fn insert(&mut self, id: CharacterId, hitbox: Hitbox) -> Result<(), SpatialError>;

    /// Unregister a character; returns whether it was present
    fn remove(&mut self, id: CharacterId) -> bool;

    /// Re-index a character after it moved
    fn update_entity(&mut self, id: CharacterId, hitbox: Hitbox) -> Result<(), SpatialError>;

    /// Add a static obstacle (walls, impassable tiles)
    fn add_static(&mut self, hitbox: Hitbox);

    /// All obstacles whose box overlaps `[x1, x2] x [y1, y2]`; touching counts
    fn query_boxes_overlapping(&self, x1: f64, x2: f64, y1: f64, y2: f64) -> Vec<Obstacle>;

    /// Indexed box of a character
    fn get_hitbox(&self, id: CharacterId) -> Option<Hitbox>;

    /// Remove everything, static geometry included
    fn clear(&mut self);

    /// Number of characters indexed
    fn entity_count(&self) -> usize;
}
