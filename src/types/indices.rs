//! Cell index triple for structured grids.

use std::fmt;

use super::Direction;

/// Ghost-inclusive cell index `(k, j, i)`.
///
/// Using a named triple prevents the `(i, j, k)` vs `(k, j, i)` mix-ups that
/// positional arguments invite, since fields are stored `k`-outermost.
///
/// # Example
///
/// ```
/// use rkl_rs::types::{CellIndex, Direction};
///
/// let cell = CellIndex::new(0, 3, 7);
/// assert_eq!(cell.forward(Direction::X1), CellIndex::new(0, 3, 8));
/// assert_eq!(cell.along(Direction::X2), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIndex {
    /// Index along X3
    pub k: usize,
    /// Index along X2
    pub j: usize,
    /// Index along X1
    pub i: usize,
}

impl CellIndex {
    /// Create a new cell index.
    #[inline]
    pub const fn new(k: usize, j: usize, i: usize) -> Self {
        Self { k, j, i }
    }

    /// The neighbour one cell forward along `dir`.
    #[inline]
    pub const fn forward(self, dir: Direction) -> Self {
        let [di, dj, dk] = dir.offsets();
        Self {
            k: self.k + dk,
            j: self.j + dj,
            i: self.i + di,
        }
    }

    /// Component of the index along `dir`.
    #[inline]
    pub const fn along(self, dir: Direction) -> usize {
        match dir {
            Direction::X1 => self.i,
            Direction::X2 => self.j,
            Direction::X3 => self.k,
        }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(k={}, j={}, i={})", self.k, self.j, self.i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_moves_one_axis() {
        let c = CellIndex::new(1, 2, 3);
        assert_eq!(c.forward(Direction::X1), CellIndex::new(1, 2, 4));
        assert_eq!(c.forward(Direction::X2), CellIndex::new(1, 3, 3));
        assert_eq!(c.forward(Direction::X3), CellIndex::new(2, 2, 3));
    }

    #[test]
    fn test_along() {
        let c = CellIndex::new(5, 6, 7);
        assert_eq!(c.along(Direction::X1), 7);
        assert_eq!(c.along(Direction::X2), 6);
        assert_eq!(c.along(Direction::X3), 5);
    }
}
