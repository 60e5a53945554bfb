//! Uniform grid spatial index
//!
//! Every box is bucketed into each cell it touches. Cells are keyed by
//! `(floor(x / cell), floor(y / cell))`, so a box whose edge lies exactly on a
//! cell boundary is stored in both neighbours and touching boxes always share
//! at least one cell.

use std::collections::{HashMap, HashSet};

use crate::character::CharacterId;
use crate::physics::Hitbox;

use super::spatial_query::{Obstacle, SpatialError, SpatialQuery};

type CellKey = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Slot {
    Static(usize),
    Character(CharacterId),
}

/// Grid-backed [`SpatialQuery`]
#[derive(Debug, Clone)]
pub struct GridSpatialIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<Slot>>,
    characters: HashMap<CharacterId, Hitbox>,
    statics: Vec<Hitbox>,
}

impl GridSpatialIndex {
    /// Create an empty index; non-positive cell sizes fall back to 1 tile
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            log::warn!("Invalid spatial cell size {cell_size}, using 1.0");
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            characters: HashMap::new(),
            statics: Vec::new(),
        }
    }

    /// Edge length of a cell
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of static obstacles
    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    /// Block a whole map tile
    pub fn block_tile(&mut self, x: i32, y: i32) {
        self.add_static(Hitbox::tile(x, y));
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, value: f64) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    fn cells_for(&self, x1: f64, x2: f64, y1: f64, y2: f64) -> impl Iterator<Item = CellKey> {
        let (cx1, cx2) = (self.cell_of(x1.min(x2)), self.cell_of(x1.max(x2)));
        let (cy1, cy2) = (self.cell_of(y1.min(y2)), self.cell_of(y1.max(y2)));
        (cx1..=cx2).flat_map(move |cx| (cy1..=cy2).map(move |cy| (cx, cy)))
    }

    fn link(&mut self, slot: Slot, hitbox: &Hitbox) {
        let keys: Vec<CellKey> = self.cells_for(hitbox.x1, hitbox.x2, hitbox.y1, hitbox.y2).collect();
        for key in keys {
            self.cells.entry(key).or_default().push(slot);
        }
    }

    fn unlink(&mut self, slot: Slot, hitbox: &Hitbox) {
        let keys: Vec<CellKey> = self.cells_for(hitbox.x1, hitbox.x2, hitbox.y1, hitbox.y2).collect();
        for key in keys {
            if let Some(slots) = self.cells.get_mut(&key) {
                slots.retain(|s| *s != slot);
                if slots.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    fn hitbox_of(&self, slot: Slot) -> Option<Obstacle> {
        match slot {
            Slot::Static(index) => self.statics.get(index).copied().map(Obstacle::fixed),
            Slot::Character(id) => self
                .characters
                .get(&id)
                .map(|hitbox| Obstacle::character(id, *hitbox)),
        }
    }
}

impl Default for GridSpatialIndex {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SpatialQuery for GridSpatialIndex {
    fn insert(&mut self, id: CharacterId, hitbox: Hitbox) -> Result<(), SpatialError> {
        if self.characters.contains_key(&id) {
            return Err(SpatialError::DuplicateEntity(id));
        }
        self.link(Slot::Character(id), &hitbox);
        self.characters.insert(id, hitbox);
        Ok(())
    }

    fn remove(&mut self, id: CharacterId) -> bool {
        match self.characters.remove(&id) {
            Some(hitbox) => {
                self.unlink(Slot::Character(id), &hitbox);
                true
            }
            None => false,
        }
    }

    fn update_entity(&mut self, id: CharacterId, hitbox: Hitbox) -> Result<(), SpatialError> {
        let previous = self
            .characters
            .get(&id)
            .copied()
            .ok_or(SpatialError::UnknownEntity(id))?;
        // Octree-style remove + re-insert
        self.unlink(Slot::Character(id), &previous);
        self.link(Slot::Character(id), &hitbox);
        self.characters.insert(id, hitbox);
        Ok(())
    }

    fn add_static(&mut self, hitbox: Hitbox) {
        let slot = Slot::Static(self.statics.len());
        self.statics.push(hitbox);
        self.link(slot, &hitbox);
    }

    fn query_boxes_overlapping(&self, x1: f64, x2: f64, y1: f64, y2: f64) -> Vec<Obstacle> {
        let band = Hitbox::new(x1.min(x2), x1.max(x2), y1.min(y2), y1.max(y2));
        let mut seen = HashSet::new();
        let mut slots: Vec<Slot> = self
            .cells_for(band.x1, band.x2, band.y1, band.y2)
            .filter_map(|key| self.cells.get(&key))
            .flatten()
            .copied()
            .filter(|slot| seen.insert(*slot))
            .collect();
        slots.sort_unstable();
        slots
            .into_iter()
            .filter_map(|slot| self.hitbox_of(slot))
            .filter(|obstacle| obstacle.hitbox.intersects(&band))
            .collect()
    }

    fn get_hitbox(&self, id: CharacterId) -> Option<Hitbox> {
        self.characters.get(&id).copied()
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.characters.clear();
        self.statics.clear();
    }

    fn entity_count(&self) -> usize {
        self.characters.len()
    }
}
