//! # rkl-rs
//!
//! Runge-Kutta-Legendre super-time-stepping for parabolic terms on
//! structured finite-volume grids.
//!
//! Diffusive terms restrict an explicit timestep to `dt ~ dx^2 / eta`. An
//! RKL cycle covers one (hyperbolic) timestep `dt` with `s` cheap stages,
//! where `s` grows only with the square root of `dt / dt_parabolic`.
//!
//! This crate provides:
//! - The RKL1/RKL2 recursion coefficients and stage-count estimator
//! - A stage controller ([`RklIntegrator`]) driving a host solver through
//!   the [`ParabolicHost`] trait
//! - Parabolic right-hand-side accumulation on Cartesian, cylindrical,
//!   polar and spherical grids
//! - Global timestep reduction across partitions ([`GlobalReduce`])
//! - A standalone diffusion host, boundary conditions and diffusivity
//!   physics
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rkl_rs::{
//!     Axis, BoundaryKind, BoundarySet, DiffusionHost, DiffusivityConfig, GeometryKind, Grid,
//!     PhysicsConfig, RklConfig, RklIntegrator, VectorDiffusion,
//! };
//!
//! let grid = Arc::new(Grid::new(
//!     GeometryKind::Cartesian,
//!     [Axis::uniform(0.0, 1.0, 32, 2), Axis::single(0.0, 1.0), Axis::single(0.0, 1.0)],
//! )?);
//! let diffusion = VectorDiffusion::new(DiffusivityConfig::constant(1e-2).build()?);
//! let mut host = DiffusionHost::new(
//!     Arc::clone(&grid),
//!     1,
//!     BoundarySet::uniform(BoundaryKind::Periodic),
//!     diffusion,
//! )?;
//! host.set_from_function(|x, _, _| (1.0, [(6.0 * x).sin(), 0.0, 0.0]));
//!
//! let mut rkl = RklIntegrator::new(grid, host.layout(), &RklConfig::default())?;
//! let report = rkl.run_cycle(&mut host, 0.0, 0.5)?;
//! assert!(report.stages >= 2);
//! # Ok::<(), rkl_rs::RklError>(())
//! ```

pub mod boundary;
pub mod comm;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod host;
pub mod physics;
pub mod simulation;
pub mod solver;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use boundary::{BoundaryKind, BoundarySet, Side, UserBoundaryFn};
pub use comm::{GlobalReduce, SinglePartition, ThreadCommunicator, ThreadGroup};
pub use config::{DEFAULT_CFL, RklConfig};
pub use error::{Result, RklError};
pub use field::{CellField, GridField, RklBuffers};
pub use grid::{Axis, CurvatureRules, GeometryKind, Grid, MetricFn, SMALL_NUMBER};
pub use host::{DiffusionHost, ParabolicHost, SolverMode};
pub use physics::{
    DiffusivityConfig, DiffusivityContext, DiffusivityFn, DiffusivityKind, DiffusivityStatus,
    PhysicsConfig, VectorDiffusion,
};
pub use simulation::{Simulation, SimulationConfig, SimulationResult};
pub use solver::{ParabolicFlux, accumulate_parabolic_rhs};
pub use time::{
    CyclePhase, CycleReport, RklIntegrator, RklOrder, RklRecursion, StageCoefficients,
    local_max_inv_dt, reduce_parabolic_dt, stage_count,
};
pub use types::{CellIndex, Direction, Sides, StateLayout};
