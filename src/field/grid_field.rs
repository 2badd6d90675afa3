//! Multi-component grid field storage.

use crate::types::CellIndex;

/// Dense multi-component field over the ghost-inclusive grid.
///
/// Values are stored component-major: `data[((v * nk + k) * nj + j) * ni + i]`,
/// so each component is one contiguous `(k, j, i)` block and each `(v, k, j)`
/// is one contiguous `i`-row.
#[derive(Clone, Debug, PartialEq)]
pub struct GridField {
    /// Values, component-major.
    pub data: Vec<f64>,
    /// Number of components.
    pub n_var: usize,
    /// Cells per direction as `[nk, nj, ni]`.
    pub shape: [usize; 3],
}

impl GridField {
    /// Create a zero-initialised field.
    pub fn new(n_var: usize, shape: [usize; 3]) -> Self {
        let [nk, nj, ni] = shape;
        Self {
            data: vec![0.0; n_var * nk * nj * ni],
            n_var,
            shape,
        }
    }

    /// Create a field of the same shape filled with zeros.
    pub fn zeros_like(&self) -> Self {
        Self::new(self.n_var, self.shape)
    }

    /// `[n_var, nk, nj, ni]`.
    pub fn dims(&self) -> [usize; 4] {
        let [nk, nj, ni] = self.shape;
        [self.n_var, nk, nj, ni]
    }

    /// Number of cells in one component.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    /// Flat offset of `(v, cell)`.
    #[inline]
    pub fn offset(&self, v: usize, cell: CellIndex) -> usize {
        let [_, nj, ni] = self.shape;
        ((v * self.shape[0] + cell.k) * nj + cell.j) * ni + cell.i
    }

    /// Value of component `v` at `cell`.
    #[inline]
    pub fn get(&self, v: usize, cell: CellIndex) -> f64 {
        self.data[self.offset(v, cell)]
    }

    /// Set component `v` at `cell`.
    #[inline]
    pub fn set(&mut self, v: usize, cell: CellIndex, value: f64) {
        let idx = self.offset(v, cell);
        self.data[idx] = value;
    }

    /// Contiguous `(k, j, i)` block of component `v`.
    pub fn component(&self, v: usize) -> &[f64] {
        let len = self.block_len();
        &self.data[v * len..(v + 1) * len]
    }

    /// Mutable block of component `v`.
    pub fn component_mut(&mut self, v: usize) -> &mut [f64] {
        let len = self.block_len();
        &mut self.data[v * len..(v + 1) * len]
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy all values from a field of identical shape.
    pub fn copy_from(&mut self, other: &GridField) {
        assert_eq!(self.dims(), other.dims(), "copy_from shape mismatch");
        self.data.copy_from_slice(&other.data);
    }

    /// Scale all values by a constant.
    pub fn scale(&mut self, c: f64) {
        for v in &mut self.data {
            *v *= c;
        }
    }

    /// Add c * other to self (axpy operation).
    pub fn axpy(&mut self, c: f64, other: &GridField) {
        assert_eq!(self.data.len(), other.data.len());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += c * *b;
        }
    }

    /// Maximum absolute value.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|&x| x.abs()).fold(0.0, f64::max)
    }
}
