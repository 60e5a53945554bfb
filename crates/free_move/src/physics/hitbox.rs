//! Character hitboxes
//!
//! A hitbox is an axis-aligned box anchored at the bottom-center of the
//! character's tile. It is `2r` wide and `2r` tall and sits on the tile's
//! bottom edge, so a radius of 0.5 covers exactly one tile.

use crate::foundation::math::Vec2;

/// Axis-aligned box in tile units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Left edge
    pub x1: f64,
    /// Right edge
    pub x2: f64,
    /// Top edge
    pub y1: f64,
    /// Bottom edge
    pub y2: f64,
}

impl Hitbox {
    /// Create a box from its edges
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Box of a character at `position` with half-width `radius`
    pub fn from_anchor(position: Vec2, radius: f64) -> Self {
        Self {
            x1: position.x + 0.5 - radius,
            x2: position.x + 0.5 + radius,
            y1: position.y + 1.0 - radius * 2.0,
            y2: position.y + 1.0,
        }
    }

    /// Box covering one whole map tile
    pub fn tile(x: i32, y: i32) -> Self {
        let (x, y) = (f64::from(x), f64::from(y));
        Self::new(x, x + 1.0, y, y + 1.0)
    }

    /// Width (`x2 - x1`)
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Height (`y2 - y1`)
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Spans overlap on x; touching edges count
    pub fn overlaps_x(&self, other: &Self) -> bool {
        !(other.x2 < self.x1 || self.x2 < other.x1)
    }

    /// Spans overlap on y; touching edges count
    pub fn overlaps_y(&self, other: &Self) -> bool {
        !(other.y2 < self.y1 || self.y2 < other.y1)
    }

    /// Overlap on both axes; touching edges count
    pub fn intersects(&self, other: &Self) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Overlap with positive area on both axes
    pub fn interpenetrates(&self, other: &Self) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// Shift by a displacement
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.x2 + dx, self.y1 + dy, self.y2 + dy)
    }
}
