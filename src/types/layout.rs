//! Conservative-variable layout.

use std::ops::Range;

/// Layout of the host's conservative state vector.
///
/// The RKL cycle only evolves the contiguous block of vector components
/// `first..first + n_components` (for viscosity this is the momentum block
/// `MX1..MX1+COMPONENTS`). Other variables are carried through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLayout {
    /// Total number of conservative variables.
    pub n_var: usize,
    /// Index of the first diffused component.
    pub first: usize,
    /// Number of diffused vector components (1 to 3).
    pub n_components: usize,
}

impl StateLayout {
    /// Create a layout.
    ///
    /// # Panics
    /// If the diffused block does not fit in `n_var` or has no components.
    pub fn new(n_var: usize, first: usize, n_components: usize) -> Self {
        assert!(
            (1..=3).contains(&n_components),
            "Need between 1 and 3 vector components, got {}",
            n_components
        );
        assert!(
            first + n_components <= n_var,
            "Diffused block {}..{} does not fit in {} variables",
            first,
            first + n_components,
            n_var
        );
        Self {
            n_var,
            first,
            n_components,
        }
    }

    /// Density plus a momentum vector: `(ρ, ρv_1, …, ρv_n)`.
    pub fn density_momentum(n_components: usize) -> Self {
        Self::new(1 + n_components, 1, n_components)
    }

    /// Variable indices of the diffused block.
    pub fn diffused(&self) -> Range<usize> {
        self.first..self.first + self.n_components
    }
}
