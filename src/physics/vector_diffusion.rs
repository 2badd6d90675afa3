//! Diffusion of a vector block (e.g. viscous momentum transport).

use super::{DiffusivityContext, DiffusivityStatus};
use crate::error::{Result, RklError};
use crate::field::{for_each_row, GridField};
use crate::grid::Grid;
use crate::solver::ParabolicFlux;
use crate::types::{CellIndex, Direction, StateLayout};

/// Face fluxes `F = -eta_face (v(here) - v(back)) / h` of every component of
/// a primitive vector block.
///
/// `eta_face` and `rho_face` are arithmetic averages of the two adjacent cell
/// values and `h` is the physical distance between the cell centres. The
/// diffusion signal is `eta_face / rho_face`, so `eta` acts as a dynamic
/// coefficient on the conservative (momentum) variables.
#[derive(Clone, Debug, Default)]
pub struct VectorDiffusion {
    status: DiffusivityStatus,
    density: usize,
    eta: Vec<f64>,
}

impl VectorDiffusion {
    /// Diffusion with a validated coefficient. Density is variable 0.
    pub fn new(status: DiffusivityStatus) -> Self {
        Self {
            status,
            density: 0,
            eta: Vec::new(),
        }
    }

    /// Use primitive variable `index` as the density.
    pub fn with_density_index(mut self, index: usize) -> Self {
        self.density = index;
        self
    }

    /// The coefficient.
    pub fn status(&self) -> &DiffusivityStatus {
        &self.status
    }

    /// Fill `out` with the fluxes of direction `dir`.
    ///
    /// Fluxes are written on the left faces of cells `beg..=end` along `dir`
    /// (and the active range of the other directions). Ghost cells of
    /// `primitive` must be filled.
    ///
    /// # Arguments
    /// * `grid` - Grid of the primitive field
    /// * `layout` - Location of the diffused vector block
    /// * `primitive` - Density and velocity, ghosts included
    /// * `dir` - Face normal direction
    /// * `time` - Time passed to a user-defined coefficient
    /// * `out` - Reset flux buffers
    pub fn compute_flux(
        &mut self,
        grid: &Grid,
        layout: &StateLayout,
        primitive: &GridField,
        dir: Direction,
        time: f64,
        out: &mut ParabolicFlux,
    ) -> Result<()> {
        if !grid.axis(dir).is_active() {
            return Err(RklError::InactiveDirection(dir));
        }
        let [nk, nj, ni] = grid.shape();
        if primitive.dims() != [layout.n_var, nk, nj, ni] {
            return Err(RklError::ShapeMismatch {
                what: "primitive state",
                expected: [layout.n_var, nk, nj, ni],
                actual: primitive.dims(),
            });
        }
        if !self.status.is_enabled() {
            return Ok(());
        }

        let rho = primitive.component(self.density);

        // Coefficient at every cell centre, ghosts included.
        self.eta.resize(nk * nj * ni, 0.0);
        let status = &self.status;
        for_each_row(&mut self.eta, ni, |row, values| {
            let (k, j) = (row / nj, row % nj);
            for (i, eta) in values.iter_mut().enumerate() {
                let cell = CellIndex::new(k, j, i);
                *eta = status.eval(&DiffusivityContext {
                    x: grid.center(cell),
                    time,
                    density: rho[row * ni + i],
                });
            }
        });

        let ranges = face_ranges(grid, dir);
        let [di, dj, dk] = dir.offsets();
        let stride = dk * nj * ni + dj * ni + di;
        let eta = &self.eta;

        for_each_row(&mut out.d_max.data, ni, |row, values| {
            if !in_rows(&ranges, row, nj) {
                return;
            }
            for i in ranges[2].clone() {
                let h = row * ni + i;
                let b = h - stride;
                values[i] = 0.5 * (eta[h] + eta[b]) / (0.5 * (rho[h] + rho[b]));
            }
        });

        for c in 0..layout.n_components {
            let v = primitive.component(layout.first + c);
            for_each_row(out.flux.component_mut(c), ni, |row, values| {
                if !in_rows(&ranges, row, nj) {
                    return;
                }
                for i in ranges[2].clone() {
                    let h = row * ni + i;
                    let b = h - stride;
                    let cell = CellIndex::new(row / nj, row % nj, i);
                    let spacing = grid.center_spacing(dir, cell);
                    let eta_face = 0.5 * (eta[h] + eta[b]);
                    values[i] = -eta_face * (v[h] - v[b]) / spacing;
                }
            });
        }

        Ok(())
    }
}

/// `[k, j, i]` ranges of the faces computed along `dir`.
fn face_ranges(grid: &Grid, dir: Direction) -> [std::ops::Range<usize>; 3] {
    let range = |d: Direction| grid.beg(d)..grid.end(d) + usize::from(d == dir);
    [range(Direction::X3), range(Direction::X2), range(Direction::X1)]
}

fn in_rows(ranges: &[std::ops::Range<usize>; 3], row: usize, nj: usize) -> bool {
    ranges[0].contains(&(row / nj)) && ranges[1].contains(&(row % nj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Axis, GeometryKind};
    use crate::physics::{DiffusivityConfig, PhysicsConfig};

    fn line() -> Grid {
        Grid::new(
            GeometryKind::Cartesian,
            [
                Axis::uniform(0.0, 1.0, 8, 2),
                Axis::single(0.0, 1.0),
                Axis::single(0.0, 1.0),
            ],
        )
        .unwrap()
    }

    fn state(grid: &Grid, rho: f64, v: impl Fn(f64) -> f64) -> GridField {
        let mut field = GridField::new(2, grid.shape());
        for i in 0..grid.axes[0].np_tot() {
            let cell = CellIndex::new(0, 0, i);
            field.set(0, cell, rho);
            field.set(1, cell, v(grid.axes[0].x[i]));
        }
        field
    }

    #[test]
    fn test_linear_profile_has_uniform_flux() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut diffusion = VectorDiffusion::new(DiffusivityConfig::constant(0.5).build().unwrap());
        let primitive = state(&grid, 2.0, |x| 3.0 * x);
        let mut out = ParabolicFlux::new(1, grid.shape());

        diffusion
            .compute_flux(&grid, &layout, &primitive, Direction::X1, 0.0, &mut out)
            .unwrap();

        for i in 2..=10 {
            let cell = CellIndex::new(0, 0, i);
            assert!((out.flux.get(0, cell) + 1.5).abs() < 1e-12, "face {}", i);
            assert!((out.d_max.get(cell) - 0.25).abs() < 1e-14);
        }
        // Faces outside beg..=end are left alone.
        assert_eq!(out.flux.get(0, CellIndex::new(0, 0, 1)), 0.0);
        assert_eq!(out.d_max.get(CellIndex::new(0, 0, 11)), 0.0);
    }

    #[test]
    fn test_user_coefficient_is_averaged() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let status = DiffusivityConfig::user_defined()
            .enroll(|c: &DiffusivityContext| c.x[0] + c.time)
            .build()
            .unwrap();
        let mut diffusion = VectorDiffusion::new(status);
        let primitive = state(&grid, 1.0, |_| 0.0);
        let mut out = ParabolicFlux::new(1, grid.shape());

        diffusion
            .compute_flux(&grid, &layout, &primitive, Direction::X1, 1.0, &mut out)
            .unwrap();

        // Face between cells 4 and 5 sits at x = 0.375.
        let d = out.d_max.get(CellIndex::new(0, 0, 5));
        assert!((d - 1.375).abs() < 1e-12, "{}", d);
    }

    #[test]
    fn test_disabled_leaves_buffers_zero() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut diffusion = VectorDiffusion::new(DiffusivityStatus::Disabled);
        let primitive = state(&grid, 1.0, |x| x);
        let mut out = ParabolicFlux::new(1, grid.shape());
        diffusion
            .compute_flux(&grid, &layout, &primitive, Direction::X1, 0.0, &mut out)
            .unwrap();
        assert!(out.d_max.data.iter().all(|&v| v == 0.0));
        assert!(out.flux.data.iter().all(|&v| v == 0.0));
    }
}
