//! Divergence of parabolic fluxes.
//!
//! For one direction `d` and every active cell:
//!
//! ```text
//! dU[first + c] += -(A F_c(fwd) - A F_c(here)) / dV + S_c
//! ```
//!
//! where `fwd` is the next cell along `d`. The azimuthal component of a
//! curvilinear grid is corrected so that angular momentum is conserved.
//! On the first stage the per-cell inverse timestep bound is accumulated as
//!
//! ```text
//! inv_dt += 0.5 max(d_max(fwd), d_max(here)) / dl²
//! ```
//!
//! with `dl` the physical cell length along `d`.

use std::ops::Range;

use crate::error::{Result, RklError};
use crate::field::{for_each_row, CellField, GridField};
use crate::grid::{Grid, SMALL_NUMBER};
use crate::solver::ParabolicFlux;
use crate::types::{CellIndex, Direction, StateLayout};

/// Add the parabolic right-hand side of direction `dir` to `du`.
///
/// `flux` is consumed: its face fluxes are scaled in place by the face areas
/// (and curvature factors). Call [`ParabolicFlux::reset`] before refilling it.
/// The inverse timestep bound is only updated when `stage == 1`.
///
/// # Arguments
/// * `grid` - Grid the fields live on
/// * `layout` - Which conservative variables receive the derivative
/// * `dir` - Direction of the fluxes in `flux`
/// * `stage` - RKL stage number, starting at 1
/// * `flux` - Face fluxes, diffusion signal and optional source of `dir`
/// * `du` - Stage derivative, shaped like the conservative state
/// * `inv_dt` - Inverse timestep bound
///
/// # Errors
/// [`RklError::InactiveDirection`] if the grid has no ghost cells along
/// `dir`, [`RklError::ShapeMismatch`] if a field does not fit the grid.
pub fn accumulate_parabolic_rhs(
    grid: &Grid,
    layout: &StateLayout,
    dir: Direction,
    stage: usize,
    flux: &mut ParabolicFlux,
    du: &mut GridField,
    inv_dt: &mut CellField,
) -> Result<()> {
    if !grid.axis(dir).is_active() {
        return Err(RklError::InactiveDirection(dir));
    }

    let [nk, nj, ni] = grid.shape();
    check_dims("parabolic flux", [layout.n_components, nk, nj, ni], flux.flux.dims())?;
    check_dims("stage derivative", [layout.n_var, nk, nj, ni], du.dims())?;
    let [ik, ij, ii] = inv_dt.shape;
    check_dims("inverse timestep", [1, nk, nj, ni], [1, ik, ij, ii])?;

    let rules = grid.curvature;
    let azimuthal = grid.geometry.azimuthal_component(layout.n_components);

    // Area-weighted fluxes, including the face after the last active cell.
    let [kr, jr, ir] = region(grid, Some(dir));
    let area = &grid.area[dir.index()];
    for c in 0..layout.n_components {
        let is_azimuthal = azimuthal == Some(c);
        for_each_row(flux.flux.component_mut(c), ni, |row, values| {
            let (k, j) = (row / nj, row % nj);
            if !kr.contains(&k) || !jr.contains(&j) {
                return;
            }
            for i in ir.clone() {
                let cell = CellIndex::new(k, j, i);
                let mut ax = area.get(cell);
                if rules.clamp_area && ax < SMALL_NUMBER {
                    ax = SMALL_NUMBER;
                }
                values[i] *= ax;
                if is_azimuthal {
                    values[i] *= (rules.azimuthal_flux)(grid, dir, cell);
                }
            }
        });
    }

    let [kr, jr, ir] = region(grid, None);
    let flux = &*flux;
    let source = flux.source();
    let volume = &grid.volume;

    for c in 0..layout.n_components {
        let is_azimuthal = azimuthal == Some(c);
        let face = flux.flux.component(c);
        let src = source.map(|s| s.component(c));

        for_each_row(du.component_mut(layout.first + c), ni, |row, values| {
            let (k, j) = (row / nj, row % nj);
            if !kr.contains(&k) || !jr.contains(&j) {
                return;
            }
            for i in ir.clone() {
                let here = CellIndex::new(k, j, i);
                let h = volume.offset(here);
                let f = volume.offset(here.forward(dir));

                let mut rhs = -(face[f] - face[h]) / volume.data[h];
                if let Some(src) = src {
                    rhs += src[h];
                }
                if is_azimuthal {
                    rhs /= (rules.azimuthal_rhs)(grid, dir, here);
                }
                values[i] += rhs;
            }
        });
    }

    if stage == 1 {
        let d_max = &flux.d_max;
        for_each_row(&mut inv_dt.data, ni, |row, values| {
            let (k, j) = (row / nj, row % nj);
            if !kr.contains(&k) || !jr.contains(&j) {
                return;
            }
            for i in ir.clone() {
                let here = CellIndex::new(k, j, i);
                let dl = (rules.cell_length)(grid, dir, here);
                let signal = d_max.get(here.forward(dir)).max(d_max.get(here));
                values[i] += 0.5 * signal / (dl * dl);
            }
        });
    }

    Ok(())
}

/// Active `[k, j, i]` ranges, optionally extended by one face along `extend`.
fn region(grid: &Grid, extend: Option<Direction>) -> [Range<usize>; 3] {
    let range = |d: Direction| {
        let extra = usize::from(extend == Some(d));
        grid.beg(d)..grid.end(d) + extra
    };
    [range(Direction::X3), range(Direction::X2), range(Direction::X1)]
}

fn check_dims(what: &'static str, expected: [usize; 4], actual: [usize; 4]) -> Result<()> {
    if expected != actual {
        return Err(RklError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
