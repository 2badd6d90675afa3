//! Super-time-stepping of parabolic terms.
//!
//! # Submodules
//!
//! - [`RklRecursion`]: per-stage coefficients of the RKL1/RKL2 recursion
//! - [`stage_count`]: number of stages for a given `dt / dt_par`
//! - [`reduce_parabolic_dt`]: partition-wide explicit parabolic timestep
//! - [`RklIntegrator`]: the cycle controller tying them together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rkl_rs::config::RklConfig;
//! use rkl_rs::grid::{Axis, GeometryKind, Grid};
//! use rkl_rs::host::DiffusionHost;
//! use rkl_rs::physics::{DiffusivityConfig, PhysicsConfig, VectorDiffusion};
//! use rkl_rs::time::RklIntegrator;
//! use rkl_rs::boundary::{BoundaryKind, BoundarySet};
//!
//! let grid = Arc::new(
//!     Grid::new(
//!         GeometryKind::Cartesian,
//!         [Axis::uniform(0.0, 6.4, 64, 2), Axis::single(0.0, 1.0), Axis::single(0.0, 1.0)],
//!     )
//!     .unwrap(),
//! );
//! let viscosity = VectorDiffusion::new(DiffusivityConfig::constant(1.0).build().unwrap());
//! let mut host = DiffusionHost::new(
//!     Arc::clone(&grid),
//!     1,
//!     BoundarySet::uniform(BoundaryKind::Periodic),
//!     viscosity,
//! )
//! .unwrap();
//! host.set_from_function(|x, _, _| (1.0, [(x * 0.5).sin(), 0.0, 0.0]));
//!
//! let mut rkl = RklIntegrator::new(grid, host.layout(), &RklConfig::default().with_cfl(0.5)).unwrap();
//! let report = rkl.run_cycle(&mut host, 0.0, 1.0).unwrap();
//! assert_eq!(report.stages, 28);
//! ```

mod coefficients;
mod rkl;
mod stage_count;
mod timestep;

pub use coefficients::{RklOrder, RklRecursion, StageCoefficients};
pub use rkl::{CyclePhase, CycleReport, RklIntegrator};
pub use stage_count::stage_count;
pub use timestep::{local_max_inv_dt, reduce_parabolic_dt};
