//! Structured grid with finite-volume metric.

use tracing::debug;

use super::{Axis, CurvatureRules, GeometryKind};
use crate::error::{Result, RklError};
use crate::field::CellField;
use crate::types::{CellIndex, Direction};

/// Lower bound applied to face areas in curvilinear geometry.
///
/// Faces on the polar axis or at the origin have zero area; dividing by the
/// flux difference there is avoided by clamping the area.
pub const SMALL_NUMBER: f64 = 1e-10;

/// Structured grid: three axes plus face areas, volumes and polar helpers.
///
/// All metric arrays cover the ghost-inclusive grid. `area[d]` at a cell is
/// the area of that cell's *left* face normal to direction `d`.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Coordinate system
    pub geometry: GeometryKind,
    /// Axes along X1, X2, X3
    pub axes: [Axis; 3],
    /// Left-face areas per direction
    pub area: [CellField; 3],
    /// Cell volumes
    pub volume: CellField,
    /// `sin(x2)` at cell centres
    pub sin_x2: Vec<f64>,
    /// `sin(x2)` at left faces
    pub sin_x2_left: Vec<f64>,
    /// Volume-weighted mean radius per X1 cell (spherical)
    pub rt: Vec<f64>,
    /// `|cos(x2_left) - cos(x2_right)|` per X2 cell (spherical)
    pub dmu: Vec<f64>,
    /// Geometry-dependent corrections for the parabolic RHS
    pub curvature: CurvatureRules,
}

impl Grid {
    /// Build a grid and compute its metric.
    ///
    /// Inactive axes (no ghost cells) must hold exactly one cell.
    pub fn new(geometry: GeometryKind, axes: [Axis; 3]) -> Result<Self> {
        for (d, axis) in axes.iter().enumerate() {
            if !axis.is_active() && axis.n_active != 1 {
                return Err(RklError::configuration(format!(
                    "axis X{} has {} cells but no ghost cells",
                    d + 1,
                    axis.n_active
                )));
            }
        }
        if axes.iter().all(|a| !a.is_active()) {
            return Err(RklError::configuration("grid has no active direction"));
        }

        let [a1, a2, a3] = &axes;

        let sin_x2: Vec<f64> = a2.x.iter().map(|t| t.sin()).collect();
        let sin_x2_left: Vec<f64> = a2.xl.iter().map(|t| t.sin()).collect();
        let rt: Vec<f64> = a1
            .xl
            .iter()
            .zip(&a1.xr)
            .map(|(&l, &r)| 2.0 / 3.0 * (r * r * r - l * l * l) / (r * r - l * l))
            .collect();
        let dmu: Vec<f64> = a2
            .xl
            .iter()
            .zip(&a2.xr)
            .map(|(l, r)| (l.cos() - r.cos()).abs())
            .collect();

        let shape = [a3.np_tot(), a2.np_tot(), a1.np_tot()];
        let mut area = [
            CellField::new(shape),
            CellField::new(shape),
            CellField::new(shape),
        ];
        let mut volume = CellField::new(shape);

        for k in 0..shape[0] {
            for j in 0..shape[1] {
                for i in 0..shape[2] {
                    let cell = CellIndex::new(k, j, i);
                    let (dx1, dx2, dx3) = (a1.dx[i], a2.dx[j], a3.dx[k]);
                    let (r, rl, rr) = (a1.x[i], a1.xl[i], a1.xr[i]);

                    let (s1, s2, s3, dv) = match geometry {
                        GeometryKind::Cartesian => {
                            (dx2 * dx3, dx1 * dx3, dx1 * dx2, dx1 * dx2 * dx3)
                        }
                        GeometryKind::Cylindrical => (
                            rl.abs() * dx2 * dx3,
                            r.abs() * dx1 * dx3,
                            dx1 * dx2,
                            r.abs() * dx1 * dx2 * dx3,
                        ),
                        GeometryKind::Polar => (
                            rl.abs() * dx2 * dx3,
                            dx1 * dx3,
                            r.abs() * dx1 * dx2,
                            r.abs() * dx1 * dx2 * dx3,
                        ),
                        GeometryKind::Spherical => {
                            let half_r2 = 0.5 * (rr * rr - rl * rl);
                            (
                                rl * rl * dmu[j] * dx3,
                                sin_x2_left[j].abs() * half_r2 * dx3,
                                half_r2 * dx2,
                                (rr * rr * rr - rl * rl * rl) / 3.0 * dmu[j] * dx3,
                            )
                        }
                    };

                    area[0].set(cell, s1);
                    area[1].set(cell, s2);
                    area[2].set(cell, s3);
                    volume.set(cell, dv);
                }
            }
        }

        debug!(
            geometry = %geometry,
            shape = ?shape,
            "Built structured grid"
        );

        Ok(Self {
            geometry,
            curvature: CurvatureRules::for_geometry(geometry),
            axes,
            area,
            volume,
            sin_x2,
            sin_x2_left,
            rt,
            dmu,
        })
    }

    /// Ghost-inclusive `[nk, nj, ni]`.
    pub fn shape(&self) -> [usize; 3] {
        [
            self.axes[2].np_tot(),
            self.axes[1].np_tot(),
            self.axes[0].np_tot(),
        ]
    }

    /// Axis along `dir`.
    #[inline]
    pub fn axis(&self, dir: Direction) -> &Axis {
        &self.axes[dir.index()]
    }

    /// First active index along `dir`.
    #[inline]
    pub fn beg(&self, dir: Direction) -> usize {
        self.axis(dir).beg()
    }

    /// One past the last active index along `dir`.
    #[inline]
    pub fn end(&self, dir: Direction) -> usize {
        self.axis(dir).end()
    }

    /// Directions with ghost cells, in evaluation order.
    pub fn active_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.axis(d).is_active())
            .collect()
    }

    /// Number of active cells.
    pub fn active_cell_count(&self) -> usize {
        self.axes.iter().map(|a| a.n_active).product()
    }

    /// Whether `cell` lies in the active region.
    pub fn is_active_cell(&self, cell: CellIndex) -> bool {
        Direction::ALL.into_iter().all(|d| {
            let idx = cell.along(d);
            idx >= self.beg(d) && idx < self.end(d)
        })
    }

    /// Coordinates of the centre of `cell`.
    pub fn center(&self, cell: CellIndex) -> [f64; 3] {
        [
            self.axes[0].x[cell.i],
            self.axes[1].x[cell.j],
            self.axes[2].x[cell.k],
        ]
    }

    /// Physical distance between the centre of `cell` and the centre of its
    /// backward neighbour along `dir`.
    ///
    /// Angular coordinates are converted to arc length at the current cell's
    /// radius.
    ///
    /// # Panics
    /// If `cell` has no backward neighbour along `dir`.
    pub fn center_spacing(&self, dir: Direction, cell: CellIndex) -> f64 {
        let axis = self.axis(dir);
        let idx = cell.along(dir);
        let delta = axis.x[idx] - axis.x[idx - 1];
        let r = self.axes[0].x[cell.i];

        match (self.geometry, dir) {
            (_, Direction::X1) | (GeometryKind::Cartesian, _) => delta,
            (GeometryKind::Polar, Direction::X2) => r.abs() * delta,
            (GeometryKind::Polar, Direction::X3) => delta,
            (GeometryKind::Cylindrical, Direction::X2) => delta,
            (GeometryKind::Cylindrical, Direction::X3) => r.abs() * delta,
            (GeometryKind::Spherical, Direction::X2) => r.abs() * delta,
            (GeometryKind::Spherical, Direction::X3) => {
                r.abs() * self.sin_x2[cell.j].abs() * delta
            }
        }
    }
}
