//! Structured grid and geometry descriptors.
//!
//! A [`Grid`] is the tensor product of three [`Axis`] objects plus the metric
//! needed by finite-volume divergence operators: face areas, cell volumes and
//! the polar helpers (`sin θ`, `rt`, `dμ`) used by spherical geometry.
//!
//! The coordinate system is a runtime tag ([`GeometryKind`]); the
//! geometry-dependent corrections applied by the parabolic RHS are selected
//! once, when the grid is built, as a [`CurvatureRules`] function table.
//!
//! # Example
//!
//! ```
//! use rkl_rs::grid::{Axis, GeometryKind, Grid};
//! use rkl_rs::types::Direction;
//!
//! // 1D Cartesian line of 64 cells with two ghost cells per side.
//! let grid = Grid::new(
//!     GeometryKind::Cartesian,
//!     [Axis::uniform(0.0, 6.4, 64, 2), Axis::single(0.0, 1.0), Axis::single(0.0, 1.0)],
//! )
//! .unwrap();
//!
//! assert_eq!(grid.active_directions(), vec![Direction::X1]);
//! assert_eq!(grid.shape(), [1, 1, 68]);
//! ```

mod axis;
mod curvature;
mod geometry;
mod structured;

pub use axis::Axis;
pub use curvature::{CurvatureRules, MetricFn};
pub use geometry::GeometryKind;
pub use structured::{Grid, SMALL_NUMBER};
