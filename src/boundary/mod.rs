//! Ghost-zone boundary conditions for the structured grid.
//!
//! Each side of each active direction carries one [`BoundaryKind`]:
//!
//! | kind          | ghost cell `g` (counted outward)                      |
//! |---------------|-------------------------------------------------------|
//! | `Periodic`    | copy of the active cell `g` cells from the other side |
//! | `Outflow`     | copy of the adjacent active cell                      |
//! | `Reflective`  | mirror image, normal vector component negated         |
//! | `UserDefined` | filled by the enrolled user function                  |
//!
//! Directions are filled in order X1, X2, X3 over the full extent of the
//! other directions, so edge and corner ghosts are filled too.
//!
//! # Example
//!
//! ```
//! use rkl_rs::boundary::{BoundaryKind, BoundarySet};
//! use rkl_rs::types::{Direction, Sides};
//!
//! let bcs = BoundarySet::uniform(BoundaryKind::Periodic)
//!     .with_direction(Direction::X1, Sides::new(BoundaryKind::Outflow, BoundaryKind::Reflective));
//! assert_eq!(bcs.kinds(Direction::X1).right, BoundaryKind::Reflective);
//! assert!(bcs.validate().is_ok());
//! ```

mod ghost;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, RklError};
use crate::field::GridField;
use crate::grid::Grid;
use crate::types::{Direction, Sides, StateLayout};

use ghost::copy_plane;

/// Boundary condition on one side of one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BoundaryKind {
    /// Wrap around to the opposite side; must be set on both sides.
    #[default]
    Periodic,
    /// Zero-gradient extrapolation.
    Outflow,
    /// Mirror with the normal vector component reversed.
    Reflective,
    /// Filled by a user function enrolled with
    /// [`BoundarySet::enroll_user_boundary`].
    UserDefined,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryKind::Periodic => "periodic",
            BoundaryKind::Outflow => "outflow",
            BoundaryKind::Reflective => "reflective",
            BoundaryKind::UserDefined => "userdef",
        };
        f.write_str(name)
    }
}

impl FromStr for BoundaryKind {
    type Err = RklError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "periodic" => Ok(BoundaryKind::Periodic),
            "outflow" => Ok(BoundaryKind::Outflow),
            "reflective" => Ok(BoundaryKind::Reflective),
            "userdef" => Ok(BoundaryKind::UserDefined),
            other => Err(RklError::configuration(format!(
                "unknown boundary condition '{}'",
                other
            ))),
        }
    }
}

/// Which end of a direction a boundary sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Low-index end
    Left,
    /// High-index end
    Right,
}

/// User boundary: `(grid, primitive field, direction, side, time)`.
///
/// Must fill every ghost cell of `side` along `direction`.
pub type UserBoundaryFn = Arc<dyn Fn(&Grid, &mut GridField, Direction, Side, f64) + Send + Sync>;

/// Boundary conditions for all six sides of the grid.
#[derive(Clone, Default)]
pub struct BoundarySet {
    kinds: [Sides<BoundaryKind>; 3],
    user: Option<UserBoundaryFn>,
}

impl BoundarySet {
    /// Same condition on every side.
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self {
            kinds: [Sides::uniform(kind); 3],
            user: None,
        }
    }

    /// Replace the conditions of one direction.
    pub fn with_direction(mut self, dir: Direction, kinds: Sides<BoundaryKind>) -> Self {
        self.kinds[dir.index()] = kinds;
        self
    }

    /// Enroll the function used by every `UserDefined` side.
    pub fn enroll_user_boundary<F>(mut self, f: F) -> Self
    where
        F: Fn(&Grid, &mut GridField, Direction, Side, f64) + Send + Sync + 'static,
    {
        self.user = Some(Arc::new(f));
        self
    }

    /// Conditions of direction `dir`.
    pub fn kinds(&self, dir: Direction) -> Sides<BoundaryKind> {
        self.kinds[dir.index()]
    }

    /// Check that periodic sides come in pairs and that user-defined sides
    /// have a function.
    pub fn validate(&self) -> Result<()> {
        for dir in Direction::ALL {
            let sides = self.kinds(dir);
            let periodic = sides.iter().filter(|&&k| k == BoundaryKind::Periodic).count();
            if periodic == 1 {
                return Err(RklError::configuration(format!(
                    "periodic boundary along {} must be set on both sides, got {}",
                    dir, sides
                )));
            }
            if self.user.is_none() && sides.iter().any(|&k| k == BoundaryKind::UserDefined) {
                return Err(RklError::unenrolled(format!("boundary along {}", dir)));
            }
        }
        Ok(())
    }

    /// Fill the ghost cells of `field` along every active direction.
    ///
    /// `layout` locates the vector block whose normal component a reflective
    /// side negates.
    pub fn apply(&self, grid: &Grid, field: &mut GridField, layout: &StateLayout, time: f64) -> Result<()> {
        for dir in grid.active_directions() {
            let axis = grid.axis(dir);
            let (beg, end, ng) = (axis.beg(), axis.end(), axis.n_ghost);
            let sides = self.kinds(dir);
            let normal = (dir.index() < layout.n_components).then(|| layout.first + dir.index());

            for (side, kind) in [(Side::Left, sides.left), (Side::Right, sides.right)] {
                if kind == BoundaryKind::UserDefined {
                    let user = self
                        .user
                        .as_ref()
                        .ok_or_else(|| RklError::unenrolled(format!("boundary along {}", dir)))?;
                    user(grid, field, dir, side, time);
                    continue;
                }

                for v in 0..field.n_var {
                    let sign = if kind == BoundaryKind::Reflective && normal == Some(v) {
                        -1.0
                    } else {
                        1.0
                    };
                    for g in 0..ng {
                        let (dst, src) = match (side, kind) {
                            (Side::Left, BoundaryKind::Periodic) => (beg - 1 - g, end - 1 - g),
                            (Side::Right, BoundaryKind::Periodic) => (end + g, beg + g),
                            (Side::Left, BoundaryKind::Outflow) => (beg - 1 - g, beg),
                            (Side::Right, BoundaryKind::Outflow) => (end + g, end - 1),
                            (Side::Left, BoundaryKind::Reflective) => (beg - 1 - g, beg + g),
                            (Side::Right, BoundaryKind::Reflective) => (end + g, end - 1 - g),
                            (_, BoundaryKind::UserDefined) => continue,
                        };
                        copy_plane(field, v, dir, dst, src, sign);
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BoundarySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundarySet")
            .field("kinds", &self.kinds)
            .field("user", &self.user.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Axis, GeometryKind};
    use crate::types::CellIndex;

    fn line() -> Grid {
        Grid::new(
            GeometryKind::Cartesian,
            [
                Axis::uniform(0.0, 1.0, 6, 2),
                Axis::single(0.0, 1.0),
                Axis::single(0.0, 1.0),
            ],
        )
        .unwrap()
    }

    fn ramp(grid: &Grid) -> GridField {
        let mut field = GridField::new(2, grid.shape());
        for i in 0..grid.axes[0].np_tot() {
            field.set(0, CellIndex::new(0, 0, i), 1.0);
            field.set(1, CellIndex::new(0, 0, i), i as f64);
        }
        field
    }

    fn at(field: &GridField, v: usize, i: usize) -> f64 {
        field.get(v, CellIndex::new(0, 0, i))
    }

    #[test]
    fn test_periodic() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut field = ramp(&grid);
        BoundarySet::uniform(BoundaryKind::Periodic)
            .apply(&grid, &mut field, &layout, 0.0)
            .unwrap();

        // Active cells are 2..8.
        assert_eq!(at(&field, 1, 1), 7.0);
        assert_eq!(at(&field, 1, 0), 6.0);
        assert_eq!(at(&field, 1, 8), 2.0);
        assert_eq!(at(&field, 1, 9), 3.0);
    }

    #[test]
    fn test_outflow_and_reflective() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut field = ramp(&grid);
        BoundarySet::uniform(BoundaryKind::Outflow)
            .with_direction(
                Direction::X1,
                Sides::new(BoundaryKind::Outflow, BoundaryKind::Reflective),
            )
            .apply(&grid, &mut field, &layout, 0.0)
            .unwrap();

        assert_eq!(at(&field, 1, 0), 2.0);
        assert_eq!(at(&field, 1, 1), 2.0);
        // Mirror with the normal momentum reversed, density kept.
        assert_eq!(at(&field, 1, 8), -7.0);
        assert_eq!(at(&field, 1, 9), -6.0);
        assert_eq!(at(&field, 0, 9), 1.0);
    }

    #[test]
    fn test_user_boundary() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut field = ramp(&grid);
        let bcs = BoundarySet::uniform(BoundaryKind::UserDefined).enroll_user_boundary(
            |grid, field, dir, side, time| {
                let axis = grid.axis(dir);
                let ghosts = match side {
                    Side::Left => 0..axis.beg(),
                    Side::Right => axis.end()..axis.np_tot(),
                };
                for i in ghosts {
                    field.set(1, CellIndex::new(0, 0, i), time);
                }
            },
        );
        assert!(bcs.validate().is_ok());
        bcs.apply(&grid, &mut field, &layout, 4.0).unwrap();
        assert_eq!(at(&field, 1, 0), 4.0);
        assert_eq!(at(&field, 1, 9), 4.0);
        assert_eq!(at(&field, 1, 5), 5.0);
    }

    #[test]
    fn test_unenrolled_user_boundary() {
        let grid = line();
        let layout = StateLayout::density_momentum(1);
        let mut field = ramp(&grid);
        let bcs = BoundarySet::uniform(BoundaryKind::UserDefined);
        assert!(matches!(bcs.validate(), Err(RklError::UnenrolledPhysics { .. })));
        assert!(matches!(
            bcs.apply(&grid, &mut field, &layout, 0.0),
            Err(RklError::UnenrolledPhysics { .. })
        ));
    }

    #[test]
    fn test_unpaired_periodic_is_rejected() {
        let bcs = BoundarySet::uniform(BoundaryKind::Outflow).with_direction(
            Direction::X2,
            Sides::new(BoundaryKind::Periodic, BoundaryKind::Outflow),
        );
        assert!(matches!(bcs.validate(), Err(RklError::Configuration(_))));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("outflow".parse::<BoundaryKind>(), Ok(BoundaryKind::Outflow));
        assert_eq!(BoundaryKind::UserDefined.to_string(), "userdef");
        assert!("open".parse::<BoundaryKind>().is_err());
    }
}
