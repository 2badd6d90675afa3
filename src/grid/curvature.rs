//! Geometry-dependent corrections for parabolic fluxes.

use super::{GeometryKind, Grid};
use crate::types::{CellIndex, Direction};

/// A metric factor evaluated at one cell (or left face) along a direction.
pub type MetricFn = fn(&Grid, Direction, CellIndex) -> f64;

/// Function table of the curvature terms, selected once per grid.
///
/// The azimuthal component of a vector flux carries angular momentum: along
/// the radial direction it is multiplied by the face radius before the
/// divergence and the result is divided by the cell radius after it. On
/// spherical grids the same happens along θ with `sin θ`.
#[derive(Clone, Copy, Debug)]
pub struct CurvatureRules {
    /// Clamp face areas to [`SMALL_NUMBER`](super::SMALL_NUMBER) from below
    pub clamp_area: bool,
    /// Multiplier applied to the azimuthal face flux
    pub azimuthal_flux: MetricFn,
    /// Divisor applied to the azimuthal right-hand side
    pub azimuthal_rhs: MetricFn,
    /// Physical cell length used for the diffusive timestep bound
    pub cell_length: MetricFn,
}

impl CurvatureRules {
    /// Rules for a coordinate system.
    pub fn for_geometry(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Cartesian => Self {
                clamp_area: false,
                azimuthal_flux: unit,
                azimuthal_rhs: unit,
                cell_length: width,
            },
            GeometryKind::Cylindrical => Self {
                clamp_area: true,
                azimuthal_flux: radial_face_radius,
                azimuthal_rhs: radial_cell_radius,
                cell_length: width,
            },
            GeometryKind::Polar => Self {
                clamp_area: true,
                azimuthal_flux: radial_face_radius,
                azimuthal_rhs: radial_cell_radius,
                cell_length: polar_length,
            },
            GeometryKind::Spherical => Self {
                clamp_area: true,
                azimuthal_flux: spherical_flux,
                azimuthal_rhs: spherical_rhs,
                cell_length: spherical_length,
            },
        }
    }
}

fn unit(_: &Grid, _: Direction, _: CellIndex) -> f64 {
    1.0
}

fn width(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    grid.axis(dir).dx[cell.along(dir)]
}

fn radial_face_radius(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    match dir {
        Direction::X1 => grid.axes[0].xl[cell.i].abs(),
        _ => 1.0,
    }
}

fn radial_cell_radius(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    match dir {
        Direction::X1 => grid.axes[0].x[cell.i],
        _ => 1.0,
    }
}

fn polar_length(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    let dl = width(grid, dir, cell);
    match dir {
        Direction::X2 => dl * grid.axes[0].x[cell.i],
        _ => dl,
    }
}

fn spherical_flux(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    match dir {
        Direction::X1 => grid.axes[0].xl[cell.i].abs(),
        Direction::X2 => grid.sin_x2_left[cell.j].abs(),
        Direction::X3 => 1.0,
    }
}

fn spherical_rhs(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    match dir {
        Direction::X1 => grid.axes[0].x[cell.i],
        Direction::X2 => grid.sin_x2[cell.j].abs(),
        Direction::X3 => 1.0,
    }
}

fn spherical_length(grid: &Grid, dir: Direction, cell: CellIndex) -> f64 {
    let dl = width(grid, dir, cell);
    match dir {
        Direction::X1 => dl,
        Direction::X2 => dl * grid.rt[cell.i],
        Direction::X3 => dl * grid.rt[cell.i] * grid.dmu[cell.j] / grid.axes[1].dx[cell.j],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Axis;

    fn spherical() -> Grid {
        Grid::new(
            GeometryKind::Spherical,
            [
                Axis::uniform(1.0, 2.0, 4, 2),
                Axis::uniform(0.5, 2.5, 4, 2),
                Axis::uniform(0.0, 1.0, 4, 2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cartesian_is_identity() {
        let grid = Grid::new(
            GeometryKind::Cartesian,
            [
                Axis::uniform(0.0, 1.0, 4, 2),
                Axis::single(0.0, 1.0),
                Axis::single(0.0, 1.0),
            ],
        )
        .unwrap();
        let rules = grid.curvature;
        let cell = CellIndex::new(0, 0, 3);
        assert!(!rules.clamp_area);
        assert_eq!((rules.azimuthal_flux)(&grid, Direction::X1, cell), 1.0);
        assert_eq!((rules.azimuthal_rhs)(&grid, Direction::X1, cell), 1.0);
        assert_eq!((rules.cell_length)(&grid, Direction::X1, cell), 0.25);
    }

    #[test]
    fn test_spherical_factors() {
        let grid = spherical();
        let rules = grid.curvature;
        let cell = CellIndex::new(3, 3, 3);

        assert_eq!(
            (rules.azimuthal_flux)(&grid, Direction::X1, cell),
            grid.axes[0].xl[3].abs()
        );
        assert_eq!(
            (rules.azimuthal_flux)(&grid, Direction::X2, cell),
            grid.sin_x2_left[3].abs()
        );
        assert_eq!(
            (rules.azimuthal_rhs)(&grid, Direction::X2, cell),
            grid.sin_x2[3].abs()
        );
        assert_eq!((rules.azimuthal_flux)(&grid, Direction::X3, cell), 1.0);

        let dl3 = (rules.cell_length)(&grid, Direction::X3, cell);
        let expected = 0.25 * grid.rt[3] * grid.dmu[3] / grid.axes[1].dx[3];
        assert!((dl3 - expected).abs() < 1e-15);
    }

    #[test]
    fn test_polar_length_scales_angle() {
        let grid = Grid::new(
            GeometryKind::Polar,
            [
                Axis::uniform(1.0, 2.0, 4, 2),
                Axis::uniform(0.0, 1.0, 4, 2),
                Axis::single(0.0, 1.0),
            ],
        )
        .unwrap();
        let cell = CellIndex::new(0, 2, 2);
        let dl = (grid.curvature.cell_length)(&grid, Direction::X2, cell);
        assert!((dl - 0.25 * grid.axes[0].x[2]).abs() < 1e-15);
    }
}
