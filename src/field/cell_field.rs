//! Scalar cell field storage.

use crate::types::CellIndex;

/// Dense scalar field over the ghost-inclusive grid, stored `(k, j, i)`.
///
/// Used for face areas, cell volumes, the diffusion signal speed and the
/// per-cell inverse-timestep bound.
#[derive(Clone, Debug, PartialEq)]
pub struct CellField {
    /// Values, `data[(k * nj + j) * ni + i]`.
    pub data: Vec<f64>,
    /// Cells per direction as `[nk, nj, ni]`.
    pub shape: [usize; 3],
}

impl CellField {
    /// Create a zero-initialised field.
    pub fn new(shape: [usize; 3]) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Create a field with every value set to `value`.
    pub fn filled(shape: [usize; 3], value: f64) -> Self {
        let [nk, nj, ni] = shape;
        Self {
            data: vec![value; nk * nj * ni],
            shape,
        }
    }

    /// Flat offset of `cell`.
    #[inline]
    pub fn offset(&self, cell: CellIndex) -> usize {
        let [_, nj, ni] = self.shape;
        (cell.k * nj + cell.j) * ni + cell.i
    }

    /// Value at `cell`.
    #[inline]
    pub fn get(&self, cell: CellIndex) -> f64 {
        self.data[self.offset(cell)]
    }

    /// Set the value at `cell`.
    #[inline]
    pub fn set(&mut self, cell: CellIndex, value: f64) {
        let idx = self.offset(cell);
        self.data[idx] = value;
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}
