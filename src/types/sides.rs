//! Per-direction side pairs with named fields.
//!
//! Provides a strongly-typed `left`/`right` pair so boundary data never
//! depends on remembering an array index convention.

use std::fmt;

/// Data for the two ends of one grid direction.
///
/// # Example
///
/// ```
/// use rkl_rs::types::Sides;
///
/// let ghosts = Sides::new(2, 3);
/// assert_eq!(ghosts.left, 2);
/// assert_eq!(ghosts.right, 3);
/// assert_eq!(ghosts.map(|n| n * 2).to_array(), [4, 6]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sides<T> {
    /// Low-index end (i = 0)
    pub left: T,
    /// High-index end (i = n - 1)
    pub right: T,
}

impl<T> Sides<T> {
    /// Create a pair with explicit named values.
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Create with the same value on both sides.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            left: value.clone(),
            right: value,
        }
    }

    /// Map a function over both sides.
    pub fn map<U, F>(self, mut f: F) -> Sides<U>
    where
        F: FnMut(T) -> U,
    {
        Sides {
            left: f(self.left),
            right: f(self.right),
        }
    }

    /// Convert to array `[left, right]`.
    pub fn to_array(self) -> [T; 2] {
        [self.left, self.right]
    }

    /// Iterate over sides in order: left, right.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.left, &self.right].into_iter()
    }
}

impl<T: Default> Default for Sides<T> {
    fn default() -> Self {
        Self {
            left: T::default(),
            right: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Sides<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L:{} R:{}", self.left, self.right)
    }
}

impl<T> From<[T; 2]> for Sides<T> {
    fn from([left, right]: [T; 2]) -> Self {
        Self { left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let sides = Sides::uniform(42);
        assert_eq!(sides.left, 42);
        assert_eq!(sides.right, 42);
    }

    #[test]
    fn test_map_and_iter() {
        let sides = Sides::new(1, 2).map(|x| x * 10);
        let collected: Vec<_> = sides.iter().copied().collect();
        assert_eq!(collected, vec![10, 20]);
    }

    #[test]
    fn test_array_conversion() {
        let sides: Sides<i32> = [3, 4].into();
        assert_eq!(sides.to_array(), [3, 4]);
        assert_eq!(sides.to_string(), "L:3 R:4");
    }
}
