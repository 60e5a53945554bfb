//! Math utilities and types
//!
//! Positions are kept in tile units as `f64`. Every displacement the movement
//! code computes is rounded to four decimal digits so that repeated fractional
//! steps do not drift apart between frames.

pub use nalgebra::Vector2;

/// 2D vector type (tile units)
pub type Vec2 = Vector2<f64>;

/// Scale used by [`round4`]
const ROUND4_SCALE: f64 = 10_000.0;

/// Round to four decimal digits
///
/// Ties round away from zero, so `-0.03125` becomes `-0.0313` and diagonal
/// steps keep the same magnitude in every direction.
pub fn round4(value: f64) -> f64 {
    (value * ROUND4_SCALE).round() / ROUND4_SCALE
}

/// Three-way sign: -1, 0 or 1
///
/// Unlike [`f64::signum`], zero (of either sign) maps to 0.
pub fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(-0.123_456), -0.1235);
        assert_eq!(round4(2.0), 2.0);
        assert_eq!(round4(0.044_194_17), 0.0442);
    }

    #[test]
    fn test_round4_ties_are_symmetric() {
        assert_eq!(round4(0.03125), 0.0313);
        assert_eq!(round4(-0.03125), -0.0313);
    }

    #[test]
    fn test_sign_treats_zero_as_zero() {
        assert_eq!(sign(3.5), 1);
        assert_eq!(sign(-0.0001), -1);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(-0.0), 0);
    }
}
