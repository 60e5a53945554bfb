//! Per-axis collision truncation
//!
//! A move is resolved as two independent 1-D sweeps (x, then y from the
//! already moved box) rather than a true 2-D swept test. Moving diagonally into
//! a wall therefore slides along it.
//!
//! For one axis:
//! 1. A zero delta returns immediately, without querying the index
//! 2. Query a band from the mover's leading edge out to `edge + delta`,
//!    spanning the mover's full extent on the other axis
//! 3. Keep obstacles that are entirely ahead on the travel axis and overlap
//!    the mover on the other axis (touching counts)
//! 4. Clamp the delta to the nearest leading edge among them
//! 5. Round to four decimals
//!
//! Positive travel stops [`COLLISION_EPSILON`] short of the obstacle; negative
//! travel stops exactly on it. The asymmetry is long-standing behaviour and
//! stopping distances depend on it.

use crate::foundation::math::round4;
use crate::spatial::{Obstacle, SpatialQuery};

use super::hitbox::Hitbox;

/// Gap left in front of an obstacle on positive travel
pub const COLLISION_EPSILON: f64 = 0.0001;

/// Travel axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical (down is positive)
    Y,
}

impl Axis {
    /// `(low, high)` span of a box on this axis
    fn span(self, hitbox: &Hitbox) -> (f64, f64) {
        match self {
            Self::X => (hitbox.x1, hitbox.x2),
            Self::Y => (hitbox.y1, hitbox.y2),
        }
    }

    /// Span on the other axis
    fn cross_span(self, hitbox: &Hitbox) -> (f64, f64) {
        match self {
            Self::X => (hitbox.y1, hitbox.y2),
            Self::Y => (hitbox.x1, hitbox.x2),
        }
    }
}

/// Result of truncating one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTruncation {
    /// Delta that can be applied safely
    pub delta: f64,
    /// Obstacles at the stopping edge, if the delta was shortened
    pub blockers: Vec<Obstacle>,
}

impl AxisTruncation {
    fn free(delta: f64) -> Self {
        Self {
            delta,
            blockers: Vec::new(),
        }
    }

    /// The proposed delta was shortened
    pub fn was_blocked(&self) -> bool {
        !self.blockers.is_empty()
    }
}

/// Shorten `delta` so `mover` stops before the nearest obstacle on `axis`
pub fn truncate_axis(index: &dyn SpatialQuery, mover: &Hitbox, delta: f64, axis: Axis) -> AxisTruncation {
    if delta == 0.0 {
        return AxisTruncation::free(delta);
    }

    let forward = delta > 0.0;
    let (near, far) = axis.span(mover);
    let (cross_lo, cross_hi) = axis.cross_span(mover);
    let (band_lo, band_hi) = if forward { (far, far + delta) } else { (near + delta, near) };

    let candidates = match axis {
        Axis::X => index.query_boxes_overlapping(band_lo, band_hi, cross_lo, cross_hi),
        Axis::Y => index.query_boxes_overlapping(cross_lo, cross_hi, band_lo, band_hi),
    };

    let ahead: Vec<(f64, Obstacle)> = candidates
        .into_iter()
        .filter_map(|obstacle| {
            let (lo, hi) = axis.span(&obstacle.hitbox);
            let is_ahead = if forward { lo >= far } else { hi <= near };
            let (other_lo, other_hi) = axis.cross_span(&obstacle.hitbox);
            let crosses = !(other_hi < cross_lo || cross_hi < other_lo);
            (is_ahead && crosses).then_some((if forward { lo } else { hi }, obstacle))
        })
        .collect();

    let nearest = ahead
        .iter()
        .map(|(edge, _)| *edge)
        .reduce(|a, b| if forward { a.min(b) } else { a.max(b) });
    let Some(edge) = nearest else {
        return AxisTruncation::free(delta);
    };

    let limit = if forward { edge - far - COLLISION_EPSILON } else { edge - near };
    let clamped = if forward { limit < delta } else { limit > delta };
    if !clamped {
        return AxisTruncation::free(round4(delta));
    }

    let blockers: Vec<Obstacle> = ahead
        .into_iter()
        .filter(|(obstacle_edge, _)| *obstacle_edge == edge)
        .map(|(_, obstacle)| obstacle)
        .collect();
    log::trace!(
        "{:?} delta {:.4} truncated to {:.4} by {} obstacle(s) at {:.4}",
        axis,
        delta,
        limit,
        blockers.len(),
        edge
    );
    AxisTruncation {
        delta: round4(limit),
        blockers,
    }
}
