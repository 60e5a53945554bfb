//! Party travel statistics

/// Step counter fed by the player's actual movement
///
/// Free movement covers fractions of a tile per frame, so steps accumulate as
/// a float and are reported rounded down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Party {
    steps: f64,
}

impl Party {
    /// Party with no steps taken
    pub fn new() -> Self {
        Self::default()
    }

    /// Add travelled distance (tiles)
    pub fn increase_steps(&mut self, steps: f64) {
        self.steps += steps;
    }

    /// Whole steps taken
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn steps(&self) -> u64 {
        self.steps.max(0.0).floor() as u64
    }

    /// Exact distance travelled
    pub fn distance(&self) -> f64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_steps_floor() {
        let mut party = Party::new();
        for _ in 0..15 {
            party.increase_steps(0.0625);
        }
        assert_eq!(party.steps(), 0);
        party.increase_steps(0.0625);
        assert_eq!(party.steps(), 1);
        party.increase_steps(2.99);
        assert_eq!(party.steps(), 3);
    }
}
