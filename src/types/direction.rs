//! Grid directions.

use std::fmt;

/// One of the three structured-grid directions.
///
/// The storage order of every field is `(k, j, i)` with `i` running along
/// [`Direction::X1`], `j` along [`Direction::X2`] and `k` along
/// [`Direction::X3`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// First coordinate (x, R or r), index `i`.
    X1,
    /// Second coordinate (y, z, φ or θ), index `j`.
    X2,
    /// Third coordinate (z or φ), index `k`.
    X3,
}

impl Direction {
    /// All directions in evaluation order.
    pub const ALL: [Direction; 3] = [Direction::X1, Direction::X2, Direction::X3];

    /// Zero-based direction number (0 for `X1`).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::X1 => 0,
            Direction::X2 => 1,
            Direction::X3 => 2,
        }
    }

    /// Direction from its zero-based number.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::X1),
            1 => Some(Direction::X2),
            2 => Some(Direction::X3),
            _ => None,
        }
    }

    /// Unit offsets `[di, dj, dk]` pointing to the forward neighbour.
    #[inline]
    pub const fn offsets(self) -> [usize; 3] {
        match self {
            Direction::X1 => [1, 0, 0],
            Direction::X2 => [0, 1, 0],
            Direction::X3 => [0, 0, 1],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}", self.index() + 1)
    }
}
