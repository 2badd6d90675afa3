//! Standalone host: density plus a diffused velocity vector.

use std::sync::Arc;

use tracing::debug;

use super::{ParabolicHost, SolverMode};
use crate::boundary::BoundarySet;
use crate::error::{Result, RklError};
use crate::field::GridField;
use crate::grid::Grid;
use crate::physics::VectorDiffusion;
use crate::solver::ParabolicFlux;
use crate::time::CycleReport;
use crate::types::{CellIndex, Direction, StateLayout};

/// Host solver with primitive state `(rho, v_1..v_n)` and conservative state
/// `(rho, rho v_1..rho v_n)`.
///
/// Only the velocity block diffuses; density is carried unchanged through an
/// RKL cycle. Useful on its own for diffusion problems and as a reference
/// for embedding the integrator in a larger solver.
pub struct DiffusionHost {
    grid: Arc<Grid>,
    layout: StateLayout,
    primitive: GridField,
    conservative: GridField,
    boundaries: BoundarySet,
    diffusion: VectorDiffusion,
    last_mode: SolverMode,
    completed_cycles: usize,
    last_report: Option<CycleReport>,
}

impl DiffusionHost {
    /// Create a host with `n_components` velocity components, all zero and
    /// unit density.
    ///
    /// # Errors
    /// Boundary validation errors, e.g. a user-defined side with no enrolled
    /// function.
    pub fn new(
        grid: Arc<Grid>,
        n_components: usize,
        boundaries: BoundarySet,
        diffusion: VectorDiffusion,
    ) -> Result<Self> {
        boundaries.validate()?;
        let layout = StateLayout::density_momentum(n_components);
        let shape = grid.shape();

        let mut primitive = GridField::new(layout.n_var, shape);
        primitive.component_mut(0).fill(1.0);
        let conservative = primitive.clone();

        Ok(Self {
            grid,
            layout,
            primitive,
            conservative,
            boundaries,
            diffusion,
            last_mode: SolverMode::Hyperbolic,
            completed_cycles: 0,
            last_report: None,
        })
    }

    /// Set the primitive state of every cell from `f(x1, x2, x3) -> (rho, v)`.
    ///
    /// Velocity components beyond the host's component count are ignored.
    /// The conservative state is updated to match.
    pub fn set_from_function<F>(&mut self, f: F)
    where
        F: Fn(f64, f64, f64) -> (f64, [f64; 3]),
    {
        let [nk, nj, ni] = self.grid.shape();
        for k in 0..nk {
            for j in 0..nj {
                for i in 0..ni {
                    let cell = CellIndex::new(k, j, i);
                    let [x1, x2, x3] = self.grid.center(cell);
                    let (rho, v) = f(x1, x2, x3);
                    self.primitive.set(0, cell, rho);
                    for (c, var) in self.layout.diffused().enumerate() {
                        self.primitive.set(var, cell, v[c]);
                    }
                }
            }
        }
        self.convert_prim_to_cons();
    }

    /// Conservative layout of this host.
    pub fn layout(&self) -> StateLayout {
        self.layout
    }

    /// The grid.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Primitive state `(rho, v)`.
    pub fn primitive(&self) -> &GridField {
        &self.primitive
    }

    /// Velocity component `c` at `cell`.
    pub fn velocity(&self, c: usize, cell: CellIndex) -> f64 {
        self.primitive.get(self.layout.first + c, cell)
    }

    /// Volume integral of conservative variable `v` over the active cells.
    pub fn integrated(&self, v: usize) -> f64 {
        let grid = &self.grid;
        let mut total = 0.0;
        for k in grid.beg(Direction::X3)..grid.end(Direction::X3) {
            for j in grid.beg(Direction::X2)..grid.end(Direction::X2) {
                for i in grid.beg(Direction::X1)..grid.end(Direction::X1) {
                    let cell = CellIndex::new(k, j, i);
                    total += grid.volume.get(cell) * self.conservative.get(v, cell);
                }
            }
        }
        total
    }

    /// Mode of the most recent call from an integrator.
    pub fn last_mode(&self) -> SolverMode {
        self.last_mode
    }

    /// Number of RKL cycles finished.
    pub fn completed_cycles(&self) -> usize {
        self.completed_cycles
    }

    /// Report of the last finished cycle.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    fn convert_prim_to_cons(&mut self) {
        let len = self.primitive.block_len();
        let (prim, cons) = (&self.primitive.data, &mut self.conservative.data);
        cons[..len].copy_from_slice(&prim[..len]);
        for var in self.layout.diffused() {
            let block = var * len..(var + 1) * len;
            for ((u, &v), &rho) in cons[block.clone()].iter_mut().zip(&prim[block]).zip(&prim[..len]) {
                *u = rho * v;
            }
        }
    }

    fn convert_cons_to_prim(&mut self) {
        let len = self.conservative.block_len();
        let (cons, prim) = (&self.conservative.data, &mut self.primitive.data);
        prim[..len].copy_from_slice(&cons[..len]);
        for var in self.layout.diffused() {
            let block = var * len..(var + 1) * len;
            for ((v, &u), &rho) in prim[block.clone()].iter_mut().zip(&cons[block]).zip(&cons[..len]) {
                *v = u / rho;
            }
        }
    }
}

impl ParabolicHost for DiffusionHost {
    fn apply_boundary(&mut self, time: f64, mode: SolverMode) -> Result<()> {
        self.last_mode = mode;
        self.boundaries
            .apply(&self.grid, &mut self.primitive, &self.layout, time)
    }

    fn prim_to_cons(&mut self, mode: SolverMode) {
        self.last_mode = mode;
        self.convert_prim_to_cons();
    }

    fn cons_to_prim(&mut self, mode: SolverMode) {
        self.last_mode = mode;
        self.convert_cons_to_prim();
    }

    fn conservative(&self) -> &GridField {
        &self.conservative
    }

    fn conservative_mut(&mut self) -> &mut GridField {
        &mut self.conservative
    }

    fn parabolic_flux(
        &mut self,
        dir: Direction,
        time: f64,
        mode: SolverMode,
        out: &mut ParabolicFlux,
    ) -> Result<()> {
        if !mode.is_parabolic() {
            return Err(RklError::InvalidInput(format!(
                "parabolic flux requested in {} mode",
                mode
            )));
        }
        self.last_mode = mode;
        self.diffusion
            .compute_flux(&self.grid, &self.layout, &self.primitive, dir, time, out)
    }

    fn end_parabolic_cycle(&mut self, report: &CycleReport) {
        self.completed_cycles += 1;
        self.last_report = Some(*report);
        self.last_mode = SolverMode::Hyperbolic;
        debug!(
            cycles = self.completed_cycles,
            stages = report.stages,
            "Diffusion host finished RKL cycle"
        );
    }
}

impl std::fmt::Debug for DiffusionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffusionHost")
            .field("layout", &self.layout)
            .field("boundaries", &self.boundaries)
            .field("diffusion", &self.diffusion)
            .field("completed_cycles", &self.completed_cycles)
            .finish()
    }
}
