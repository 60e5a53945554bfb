//! Auto-move accumulator
//!
//! Holds the displacement a character still has to cover. The per-frame
//! update consumes it a step at a time; a component that would cross zero is
//! snapped to zero instead of flipping sign.

use crate::foundation::math::sign;

/// Pending auto-move displacement of one character
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutoMove {
    dx: f64,
    dy: f64,
}

impl AutoMove {
    /// Idle accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending displacement
    ///
    /// A zero vector leaves any existing target untouched and returns `false`.
    pub fn set_target(&mut self, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.dx = dx;
        self.dy = dy;
        true
    }

    /// Subtract a frame's displacement from the pending target
    ///
    /// Each axis is handled independently and only while it is non-zero. If
    /// the remainder would not keep the sign of the pending value (it hit
    /// zero or went past it) the axis is settled at exactly zero.
    pub fn consume(&mut self, dx: f64, dy: f64) {
        self.dx = consume_axis(self.dx, dx);
        self.dy = consume_axis(self.dy, dy);
    }

    /// Either axis still has distance left
    pub fn is_active(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }

    /// Drop all pending displacement
    pub fn reset(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }

    /// Remaining `(dx, dy)`
    pub fn pending(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }
}

fn consume_axis(pending: f64, applied: f64) -> f64 {
    if pending == 0.0 {
        return pending;
    }
    let remainder = pending - applied;
    if sign(remainder) == sign(pending) {
        remainder
    } else {
        0.0
    }
}
