//! Character identity

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identifier for a character, used as the spatial index key
///
/// Ids come from a process-wide monotonic counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId {
    id: u64,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl CharacterId {
    /// Allocate the next unused id
    pub fn next() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let a = CharacterId::next();
        let b = CharacterId::next();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }
}
