//! 8-way directions and sprite facing
//!
//! Codes follow the numeric keypad layout:
//!
//! ```text
//! 7 8 9
//! 4   6
//! 1 2 3
//! ```
//!
//! Movement may use any of the eight directions (or an arbitrary vector), but
//! sprites only have four facings. Diagonals are reduced to a cardinal facing
//! relative to the current one, which keeps the sprite from flickering when a
//! diagonal vector is almost axis-aligned.

/// One of the eight compass directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 1
    DownLeft = 1,
    /// 2
    Down = 2,
    /// 3
    DownRight = 3,
    /// 4
    Left = 4,
    /// 6
    Right = 6,
    /// 7
    UpLeft = 7,
    /// 8
    Up = 8,
    /// 9
    UpRight = 9,
}

impl Direction {
    /// All eight directions in code order
    pub const ALL: [Self; 8] = [
        Self::DownLeft,
        Self::Down,
        Self::DownRight,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::Up,
        Self::UpRight,
    ];

    /// Parse a keypad code; 5 and anything outside 1..=9 are not directions
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::DownLeft),
            2 => Some(Self::Down),
            3 => Some(Self::DownRight),
            4 => Some(Self::Left),
            6 => Some(Self::Right),
            7 => Some(Self::UpLeft),
            8 => Some(Self::Up),
            9 => Some(Self::UpRight),
            _ => None,
        }
    }

    /// Keypad code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Odd codes are diagonals
    pub fn is_diagonal(self) -> bool {
        self.code() % 2 == 1
    }

    /// 1, 4, 7
    pub fn is_left(self) -> bool {
        self.code() % 3 == 1
    }

    /// 3, 6, 9
    pub fn is_right(self) -> bool {
        self.code() % 3 == 0
    }

    /// 7, 8, 9
    pub fn is_up(self) -> bool {
        self.code() > 6
    }

    /// 1, 2, 3
    pub fn is_down(self) -> bool {
        self.code() < 4
    }

    /// Unit step on each axis (-1, 0 or 1); y grows downward
    pub fn axis_steps(self) -> (f64, f64) {
        let x = if self.is_left() {
            -1.0
        } else if self.is_right() {
            1.0
        } else {
            0.0
        };
        let y = if self.is_up() {
            -1.0
        } else if self.is_down() {
            1.0
        } else {
            0.0
        };
        (x, y)
    }

    /// Resolve a displacement into a direction
    ///
    /// The horizontal sign picks the west or east family first, then the
    /// vertical sign turns it into a diagonal. A zero vector has no direction.
    pub fn from_delta(dx: f64, dy: f64) -> Option<Self> {
        let code = if dx < 0.0 {
            Some(4)
        } else if dx > 0.0 {
            Some(6)
        } else {
            None
        };
        let code = match code {
            Some(code) if dy > 0.0 => Some(code - 3),
            Some(code) if dy < 0.0 => Some(code + 3),
            Some(code) => Some(code),
            None if dy > 0.0 => Some(2),
            None if dy < 0.0 => Some(8),
            None => None,
        };
        code.and_then(Self::from_code)
    }
}

/// Sprite facing after a direction change
///
/// No-op when `new_dir` repeats `last_dir`. A cardinal `new_dir` is taken as
/// is. A diagonal only swaps between the two cardinals perpendicular to the
/// current facing: facing down or up flips to left/right by the diagonal's
/// horizontal lean, facing left or right flips to up/down by its vertical lean.
pub fn resolve_facing(current: Direction, last_dir: Direction, new_dir: Direction) -> Direction {
    if new_dir == last_dir {
        return current;
    }
    if !new_dir.is_diagonal() {
        return new_dir;
    }
    match current {
        Direction::Down | Direction::Up => {
            if new_dir.is_left() {
                Direction::Left
            } else if new_dir.is_right() {
                Direction::Right
            } else {
                current
            }
        }
        Direction::Left | Direction::Right => {
            if new_dir.is_up() {
                Direction::Up
            } else if new_dir.is_down() {
                Direction::Down
            } else {
                current
            }
        }
        // A diagonal facing can only be set directly; leave it alone
        _ => current,
    }
}
