//! Parabolic timestep reduction.

use tracing::trace;

use crate::comm::{nan_max, GlobalReduce};
use crate::error::{Result, RklError};
use crate::field::{reduce_rows, CellField};
use crate::grid::Grid;
use crate::types::Direction;

/// Maximum of the inverse-timestep bound over this partition's active cells.
///
/// A NaN anywhere in the active region makes the result NaN.
pub fn local_max_inv_dt(grid: &Grid, inv_dt: &CellField) -> f64 {
    let [_, nj, ni] = inv_dt.shape;
    let (kb, ke) = (grid.beg(Direction::X3), grid.end(Direction::X3));
    let (jb, je) = (grid.beg(Direction::X2), grid.end(Direction::X2));
    let (ib, ie) = (grid.beg(Direction::X1), grid.end(Direction::X1));

    reduce_rows(
        &inv_dt.data,
        ni,
        0.0,
        |row, values| {
            let (k, j) = (row / nj, row % nj);
            if k < kb || k >= ke || j < jb || j >= je {
                return 0.0;
            }
            values[ib..ie].iter().copied().fold(0.0, nan_max)
        },
        nan_max,
    )
}

/// Stable parabolic timestep `cfl / (2 max(inv_dt))`, identical on every
/// partition.
///
/// Every partition must call this once per cycle: the global maximum is a
/// blocking collective.
///
/// # Errors
/// [`RklError::DivergentTimestep`] if the global maximum is zero or not
/// finite, which happens when no diffusion is active or a NaN reached the
/// diffusion signal.
pub fn reduce_parabolic_dt<C>(grid: &Grid, inv_dt: &CellField, cfl: f64, comm: &C) -> Result<f64>
where
    C: GlobalReduce + ?Sized,
{
    let local = local_max_inv_dt(grid, inv_dt);
    let global = comm.global_max(local);
    trace!(local, global, rank = comm.rank(), "Reduced inverse parabolic dt");

    if !(global > 0.0) || !global.is_finite() {
        return Err(RklError::DivergentTimestep { max_inv_dt: global });
    }

    let dt = 1.0 / global;
    Ok((cfl * dt) / 2.0)
}
