//! RKL cycle controller.
//!
//! One call to [`RklIntegrator::run_cycle`] advances the parabolic terms of
//! the host by a full hyperbolic timestep:
//!
//! ```text
//! Idle -> StagePrep -> StageRun(2) -> ... -> StageRun(s) -> Done -> Idle
//! ```
//!
//! `StagePrep` evaluates the first-stage derivative, reduces the parabolic
//! timestep over all partitions and sizes the cycle; each `StageRun(j)`
//! applies one step of the Legendre recursion to the diffused components.

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, debug_span, trace, trace_span};

use super::{reduce_parabolic_dt, stage_count, RklOrder, RklRecursion, StageCoefficients};
use crate::comm::{GlobalReduce, SinglePartition};
use crate::config::RklConfig;
use crate::error::{Result, RklError};
use crate::field::{for_each_row_pair, CellField, GridField, RklBuffers};
use crate::grid::Grid;
use crate::host::{ParabolicHost, SolverMode};
use crate::solver::{accumulate_parabolic_rhs, ParabolicFlux};
use crate::types::{Direction, StateLayout};

// =============================================================================
// Phase and report
// =============================================================================

/// Position of the controller within a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CyclePhase {
    /// No cycle running.
    #[default]
    Idle,
    /// First stage: derivative, timestep and stage count.
    StagePrep,
    /// Stage `j >= 2` of the recursion.
    StageRun(usize),
    /// Last stage finished, host being notified.
    Done,
}

impl CyclePhase {
    /// Stage number of a running cycle.
    pub fn stage(self) -> Option<usize> {
        match self {
            CyclePhase::StagePrep => Some(1),
            CyclePhase::StageRun(j) => Some(j),
            CyclePhase::Idle | CyclePhase::Done => None,
        }
    }
}

/// Summary of a completed cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleReport {
    /// Number of stages used
    pub stages: usize,
    /// Stable explicit parabolic timestep
    pub dt_parabolic: f64,
    /// Length of the cycle
    pub dt_hyperbolic: f64,
    /// `dt_hyperbolic / dt_parabolic`
    pub ratio: f64,
    /// Time at the start of the cycle
    pub start_time: f64,
    /// Time reached by the last stage
    pub end_time: f64,
}

// =============================================================================
// Integrator
// =============================================================================

/// Runge-Kutta-Legendre super-time-stepping integrator.
///
/// Owns the snapshot buffers of the recursion and the flux scratch space;
/// both are allocated once, with the shape of the grid, at construction.
/// The host state is only borrowed for the duration of
/// [`run_cycle`](Self::run_cycle).
///
/// # Type Parameters
///
/// * `C` - Collective used to agree on the parabolic timestep across
///   partitions
pub struct RklIntegrator<C: GlobalReduce = SinglePartition> {
    grid: Arc<Grid>,
    layout: StateLayout,
    cfl: f64,
    order: RklOrder,
    max_stages: Option<usize>,
    buffers: RklBuffers,
    flux: ParabolicFlux,
    comm: C,
    phase: CyclePhase,
}

impl RklIntegrator<SinglePartition> {
    /// Integrator for an undecomposed domain.
    pub fn new(grid: Arc<Grid>, layout: StateLayout, config: &RklConfig) -> Result<Self> {
        Self::with_communicator(grid, layout, config, SinglePartition)
    }
}

impl<C: GlobalReduce> RklIntegrator<C> {
    /// Integrator for one partition of a decomposed domain.
    pub fn with_communicator(
        grid: Arc<Grid>,
        layout: StateLayout,
        config: &RklConfig,
        comm: C,
    ) -> Result<Self> {
        config.validate()?;
        let cfl = config.resolved_cfl()?;
        let shape = grid.shape();

        tracing::info!(
            order = %config.order,
            cfl,
            max_stages = ?config.max_stages,
            n_var = layout.n_var,
            components = layout.n_components,
            rank = comm.rank(),
            "RKL integrator initialised"
        );

        Ok(Self {
            layout,
            cfl,
            order: config.order,
            max_stages: config.max_stages,
            buffers: RklBuffers::new(layout.n_var, shape),
            flux: ParabolicFlux::new(layout.n_components, shape),
            grid,
            comm,
            phase: CyclePhase::Idle,
        })
    }

    /// Advance the host's parabolic terms from `time` to `time + dt_hyperbolic`.
    ///
    /// # Arguments
    /// * `host` - Solver whose conservative state is evolved
    /// * `time` - Start of the cycle
    /// * `dt_hyperbolic` - Length of the cycle
    ///
    /// # Errors
    /// - [`RklError::CycleInProgress`] if a previous cycle failed and was not
    ///   [aborted](Self::abort_cycle)
    /// - [`RklError::DivergentTimestep`] if no diffusion signal is present
    /// - [`RklError::StageLimitExceeded`] if the cycle needs more stages than
    ///   configured
    /// - any error raised by the host
    ///
    /// A failed cycle leaves the host state partially updated and the
    /// controller in the phase that failed.
    pub fn run_cycle<H>(&mut self, host: &mut H, time: f64, dt_hyperbolic: f64) -> Result<CycleReport>
    where
        H: ParabolicHost + ?Sized,
    {
        if self.phase != CyclePhase::Idle {
            return Err(RklError::CycleInProgress {
                stage: self.phase.stage().unwrap_or(0),
            });
        }
        if !(dt_hyperbolic > 0.0) || !dt_hyperbolic.is_finite() {
            return Err(RklError::InvalidInput(format!(
                "cycle length must be positive and finite, got {}",
                dt_hyperbolic
            )));
        }
        self.check_host(host)?;

        let _cycle = debug_span!("rkl_cycle", time, dt = dt_hyperbolic).entered();

        // First stage
        self.phase = CyclePhase::StagePrep;
        let mode = SolverMode::Parabolic { stage: 1 };
        host.apply_boundary(time, mode)?;
        host.prim_to_cons(mode);
        self.buffers.snapshot_initial(host.conservative());

        self.evolve_stage(host, time, 1)?;

        let dt_parabolic =
            reduce_parabolic_dt(&self.grid, &self.buffers.inv_dt, self.cfl, &self.comm)?;
        self.buffers.freeze_derivative();

        let ratio = dt_hyperbolic / dt_parabolic;
        let stages = stage_count(ratio, self.order)?;
        if let Some(limit) = self.max_stages
            && stages > limit
        {
            return Err(RklError::StageLimitExceeded {
                required: stages,
                limit,
            });
        }
        debug!(stages, dt_parabolic, ratio, "Sized RKL cycle");

        let mut recursion = RklRecursion::new(self.order, stages)?;
        let first = recursion.first();
        self.first_update(host.conservative_mut(), first.mu_tilde * dt_hyperbolic);
        host.cons_to_prim(mode);

        let mut stage_time = recursion.stage_time(time, 1, dt_hyperbolic);

        // Remaining stages
        while let Some(coeffs) = recursion.next() {
            let stage = coeffs.stage;
            let _stage = trace_span!("rkl_stage", stage).entered();
            self.phase = CyclePhase::StageRun(stage);
            let mode = SolverMode::Parabolic { stage };

            host.apply_boundary(stage_time, mode)?;
            self.evolve_stage(host, stage_time, stage)?;
            self.stage_update(host.conservative_mut(), &coeffs, dt_hyperbolic);
            host.cons_to_prim(mode);

            stage_time = recursion.stage_time(time, stage, dt_hyperbolic);
            trace!(stage, stage_time, mu = coeffs.mu, nu = coeffs.nu, "Finished RKL stage");
        }

        self.phase = CyclePhase::Done;
        let report = CycleReport {
            stages,
            dt_parabolic,
            dt_hyperbolic,
            ratio,
            start_time: time,
            end_time: stage_time,
        };
        host.end_parabolic_cycle(&report);
        self.phase = CyclePhase::Idle;

        Ok(report)
    }

    /// Return to `Idle` after a failed cycle.
    ///
    /// The host state is left as the failed stage wrote it.
    pub fn abort_cycle(&mut self) {
        if self.phase != CyclePhase::Idle {
            tracing::warn!(phase = ?self.phase, "Aborting RKL cycle");
        }
        self.phase = CyclePhase::Idle;
    }

    /// Evaluate the derivative of stage `stage` at `time` into `du`.
    fn evolve_stage<H>(&mut self, host: &mut H, time: f64, stage: usize) -> Result<()>
    where
        H: ParabolicHost + ?Sized,
    {
        self.buffers.reset_stage();
        let mode = SolverMode::Parabolic { stage };

        for dir in self.grid.active_directions() {
            self.flux.reset();
            host.parabolic_flux(dir, time, mode, &mut self.flux)?;
            accumulate_parabolic_rhs(
                &self.grid,
                &self.layout,
                dir,
                stage,
                &mut self.flux,
                &mut self.buffers.du,
                &mut self.buffers.inv_dt,
            )?;
        }
        Ok(())
    }

    /// `Uc1 = Uc; Uc = Uc1 + factor dU0` for every variable.
    fn first_update(&mut self, uc: &mut GridField, factor: f64) {
        let [kr, jr, ir] = self.active_region();
        let nj = self.grid.shape()[1];
        let ni = uc.shape[2];

        for v in 0..self.layout.n_var {
            let du0 = self.buffers.du0.component(v);
            for_each_row_pair(
                uc.component_mut(v),
                self.buffers.uc1.component_mut(v),
                ni,
                |row, uc, uc1| {
                    if !kr.contains(&(row / nj)) || !jr.contains(&(row % nj)) {
                        return;
                    }
                    let base = row * ni;
                    for i in ir.clone() {
                        uc1[i] = uc[i];
                        uc[i] = uc1[i] + factor * du0[base + i];
                    }
                },
            );
        }
    }

    /// One step of the recursion on the diffused components.
    fn stage_update(&mut self, uc: &mut GridField, coeffs: &StageCoefficients, dt: f64) {
        let [kr, jr, ir] = self.active_region();
        let nj = self.grid.shape()[1];
        let ni = uc.shape[2];

        let (mu, nu) = (coeffs.mu, coeffs.nu);
        let w0 = 1.0 - mu - nu;
        let w_du = dt * coeffs.mu_tilde;
        let w_du0 = coeffs.gamma * dt;
        let order = self.order;

        for v in self.layout.diffused() {
            let uc0 = self.buffers.uc0.component(v);
            let du = self.buffers.du.component(v);
            let du0 = self.buffers.du0.component(v);
            for_each_row_pair(
                uc.component_mut(v),
                self.buffers.uc1.component_mut(v),
                ni,
                |row, uc, uc1| {
                    if !kr.contains(&(row / nj)) || !jr.contains(&(row % nj)) {
                        return;
                    }
                    let base = row * ni;
                    for i in ir.clone() {
                        let y = mu * uc[i] + nu * uc1[i];
                        uc1[i] = uc[i];
                        uc[i] = match order {
                            RklOrder::First => y + w_du * du[base + i],
                            RklOrder::Second => {
                                y + w0 * uc0[base + i] + w_du * du[base + i] + w_du0 * du0[base + i]
                            }
                        };
                    }
                },
            );
        }
    }

    fn active_region(&self) -> [Range<usize>; 3] {
        let range = |d: Direction| self.grid.beg(d)..self.grid.end(d);
        [range(Direction::X3), range(Direction::X2), range(Direction::X1)]
    }

    fn check_host<H: ParabolicHost + ?Sized>(&self, host: &H) -> Result<()> {
        let expected = self.buffers.dims();
        let actual = host.conservative().dims();
        if expected != actual {
            return Err(RklError::ShapeMismatch {
                what: "conservative state",
                expected,
                actual,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Temporal order.
    pub fn order(&self) -> RklOrder {
        self.order
    }

    /// Resolved CFL number.
    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    /// Stage limit, if any.
    pub fn max_stages(&self) -> Option<usize> {
        self.max_stages
    }

    /// Grid the integrator was built for.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Conservative layout.
    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Inverse-timestep bound of the last evaluated stage.
    ///
    /// Only the first stage writes it; later stages leave it zero.
    pub fn inverse_dt(&self) -> &CellField {
        &self.buffers.inv_dt
    }

    /// Derivative of the last evaluated stage.
    pub fn derivative(&self) -> &GridField {
        &self.buffers.du
    }

    /// Derivative of the first stage of the last cycle.
    pub fn first_derivative(&self) -> &GridField {
        &self.buffers.du0
    }

    /// Collective used for the timestep reduction.
    pub fn communicator(&self) -> &C {
        &self.comm
    }
}

impl<C: GlobalReduce> std::fmt::Debug for RklIntegrator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RklIntegrator")
            .field("order", &self.order)
            .field("cfl", &self.cfl)
            .field("max_stages", &self.max_stages)
            .field("layout", &self.layout)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Axis, GeometryKind};
    use crate::types::CellIndex;

    /// Host with zero fluxes and a uniform diffusion signal.
    struct StillHost {
        uc: GridField,
        signal: f64,
        fail_at: Option<usize>,
        calls: Vec<(&'static str, SolverMode, f64)>,
        reports: Vec<CycleReport>,
    }

    impl StillHost {
        fn new(grid: &Grid, signal: f64) -> Self {
            let mut uc = GridField::new(2, grid.shape());
            uc.fill(1.5);
            Self {
                uc,
                signal,
                fail_at: None,
                calls: Vec::new(),
                reports: Vec::new(),
            }
        }
    }

    impl ParabolicHost for StillHost {
        fn apply_boundary(&mut self, time: f64, mode: SolverMode) -> Result<()> {
            self.calls.push(("boundary", mode, time));
            Ok(())
        }

        fn prim_to_cons(&mut self, mode: SolverMode) {
            self.calls.push(("prim_to_cons", mode, 0.0));
        }

        fn cons_to_prim(&mut self, mode: SolverMode) {
            self.calls.push(("cons_to_prim", mode, 0.0));
        }

        fn conservative(&self) -> &GridField {
            &self.uc
        }

        fn conservative_mut(&mut self) -> &mut GridField {
            &mut self.uc
        }

        fn parabolic_flux(
            &mut self,
            _dir: Direction,
            time: f64,
            mode: SolverMode,
            out: &mut ParabolicFlux,
        ) -> Result<()> {
            self.calls.push(("flux", mode, time));
            if mode.stage() == self.fail_at {
                return Err(RklError::unenrolled("test flux"));
            }
            out.d_max.fill(self.signal);
            Ok(())
        }

        fn end_parabolic_cycle(&mut self, report: &CycleReport) {
            self.reports.push(*report);
        }
    }

    fn line() -> Arc<Grid> {
        Arc::new(
            Grid::new(
                GeometryKind::Cartesian,
                [
                    Axis::uniform(0.0, 6.4, 64, 2),
                    Axis::single(0.0, 1.0),
                    Axis::single(0.0, 1.0),
                ],
            )
            .unwrap(),
        )
    }

    fn integrator(config: RklConfig) -> RklIntegrator {
        RklIntegrator::new(line(), StateLayout::density_momentum(1), &config).unwrap()
    }

    #[test]
    fn test_zero_flux_is_identity() {
        let mut rkl = integrator(RklConfig::default().with_cfl(0.5));
        let mut host = StillHost::new(rkl.grid(), 1.0);

        let report = rkl.run_cycle(&mut host, 0.0, 1.0).unwrap();

        assert_eq!(report.stages, 28);
        assert!((report.dt_parabolic - 0.005).abs() < 1e-12);
        assert!((report.end_time - 1.0).abs() < 1e-12);
        for &v in &host.uc.data {
            assert!((v - 1.5).abs() < 1e-12);
        }
        assert_eq!(rkl.phase(), CyclePhase::Idle);
        assert_eq!(host.reports, vec![report]);
    }

    #[test]
    fn test_bound_only_written_by_first_stage() {
        let mut rkl = integrator(RklConfig::default());
        let mut host = StillHost::new(rkl.grid(), 1.0);
        rkl.run_cycle(&mut host, 0.0, 0.1).unwrap();
        assert!(rkl.inverse_dt().data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_modes_and_times_are_threaded() {
        let mut rkl = integrator(RklConfig::default());
        let mut host = StillHost::new(rkl.grid(), 1.0);
        let report = rkl.run_cycle(&mut host, 2.0, 0.05).unwrap();

        let recursion = RklRecursion::new(RklOrder::Second, report.stages).unwrap();
        let boundaries: Vec<_> = host
            .calls
            .iter()
            .filter(|(what, _, _)| *what == "boundary")
            .collect();
        assert_eq!(boundaries.len(), report.stages);
        for (n, (_, mode, time)) in boundaries.iter().enumerate() {
            let stage = n + 1;
            assert_eq!(mode.stage(), Some(stage));
            let expected = if stage == 1 {
                2.0
            } else {
                recursion.stage_time(2.0, stage - 1, 0.05)
            };
            assert_eq!(*time, expected);
        }
        assert!(host.calls.iter().all(|(_, mode, _)| mode.is_parabolic()));
        assert_eq!(
            host.calls.iter().filter(|(w, _, _)| *w == "prim_to_cons").count(),
            1
        );
    }

    #[test]
    fn test_failed_cycle_blocks_until_aborted() {
        let mut rkl = integrator(RklConfig::default());
        let mut host = StillHost::new(rkl.grid(), 1.0);
        host.fail_at = Some(3);

        assert!(matches!(
            rkl.run_cycle(&mut host, 0.0, 1.0),
            Err(RklError::UnenrolledPhysics { .. })
        ));
        assert_eq!(rkl.phase(), CyclePhase::StageRun(3));
        assert_eq!(
            rkl.run_cycle(&mut host, 0.0, 1.0),
            Err(RklError::CycleInProgress { stage: 3 })
        );

        rkl.abort_cycle();
        host.fail_at = None;
        assert!(rkl.run_cycle(&mut host, 0.0, 1.0).is_ok());
        assert!(host.reports.len() == 1);
    }

    #[test]
    fn test_stage_limit_is_hard() {
        let mut rkl = integrator(RklConfig::default().with_max_stages(10));
        let mut host = StillHost::new(rkl.grid(), 1.0);
        assert_eq!(
            rkl.run_cycle(&mut host, 0.0, 1.0),
            Err(RklError::StageLimitExceeded {
                required: 28,
                limit: 10
            })
        );
        // The state was not advanced past the first snapshot.
        assert!(host.uc.data.iter().all(|&v| v == 1.5));
    }

    #[test]
    fn test_no_signal_is_divergent() {
        let mut rkl = integrator(RklConfig::default());
        let mut host = StillHost::new(rkl.grid(), 0.0);
        assert!(matches!(
            rkl.run_cycle(&mut host, 0.0, 1.0),
            Err(RklError::DivergentTimestep { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rkl = integrator(RklConfig::default());
        let mut host = StillHost::new(rkl.grid(), 1.0);
        assert!(matches!(
            rkl.run_cycle(&mut host, 0.0, -1.0),
            Err(RklError::InvalidInput(_))
        ));
        assert_eq!(rkl.phase(), CyclePhase::Idle);

        host.uc = GridField::new(3, rkl.grid().shape());
        assert!(matches!(
            rkl.run_cycle(&mut host, 0.0, 1.0),
            Err(RklError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_ghost_cells_are_not_updated() {
        let mut rkl = integrator(RklConfig::default().with_order(RklOrder::First));
        let mut host = StillHost::new(rkl.grid(), 1.0);
        host.uc.set(1, CellIndex::new(0, 0, 0), 9.0);
        let report = rkl.run_cycle(&mut host, 0.0, 1.0).unwrap();
        assert_eq!(report.stages, 20);
        assert_eq!(host.uc.get(1, CellIndex::new(0, 0, 0)), 9.0);
    }
}
