//! Cycle runner.

use crate::comm::{GlobalReduce, SinglePartition};
use crate::error::{Result, RklError};
use crate::host::ParabolicHost;
use crate::time::RklIntegrator;

// =============================================================================
// Simulation Config
// =============================================================================

/// Configuration for a run of RKL cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Length of one cycle (the hyperbolic timestep).
    pub dt_cycle: f64,
    /// Interval for calling callbacks (in simulation time units).
    pub callback_interval: Option<f64>,
    /// Maximum number of cycles.
    pub max_cycles: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_cycle: 1.0,
            callback_interval: None,
            max_cycles: None,
        }
    }
}

// =============================================================================
// Simulation Result
// =============================================================================

/// Statistics of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Final simulation time reached.
    pub final_time: f64,
    /// Number of cycles run.
    pub n_cycles: usize,
    /// Stages summed over all cycles.
    pub total_stages: usize,
    /// Largest stage count of any cycle.
    pub max_stages: usize,
    /// Smallest explicit parabolic timestep seen.
    pub dt_parabolic_min: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
}

impl SimulationResult {
    /// Average number of stages per cycle.
    pub fn mean_stages(&self) -> f64 {
        if self.n_cycles == 0 {
            0.0
        } else {
            self.total_stages as f64 / self.n_cycles as f64
        }
    }
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// Runs RKL cycles of fixed length until a final time.
///
/// # Type Parameters
///
/// * `C` - Collective of the wrapped integrator
pub struct Simulation<C: GlobalReduce = SinglePartition> {
    integrator: RklIntegrator<C>,
    config: SimulationConfig,
}

impl<C: GlobalReduce> Simulation<C> {
    /// Wrap an integrator.
    pub fn new(integrator: RklIntegrator<C>) -> Self {
        Self {
            integrator,
            config: SimulationConfig::default(),
        }
    }

    /// Set the cycle length.
    pub fn with_dt_cycle(mut self, dt: f64) -> Self {
        self.config.dt_cycle = dt;
        self
    }

    /// Set the callback interval.
    pub fn with_callback_interval(mut self, interval: f64) -> Self {
        self.config.callback_interval = Some(interval);
        self
    }

    /// Set the maximum number of cycles.
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.config.max_cycles = Some(max_cycles);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The wrapped integrator.
    pub fn integrator(&self) -> &RklIntegrator<C> {
        &self.integrator
    }

    /// Mutable access to the wrapped integrator (e.g. to abort a failed cycle).
    pub fn integrator_mut(&mut self) -> &mut RklIntegrator<C> {
        &mut self.integrator
    }

    /// Run from `t_start` to `t_end`.
    pub fn run<H>(&mut self, host: &mut H, t_start: f64, t_end: f64) -> Result<SimulationResult>
    where
        H: ParabolicHost + ?Sized,
    {
        self.run_with_callback(host, t_start, t_end, |_, _| {})
    }

    /// Run with a callback called at the configured interval (or after every
    /// cycle if not set), and once at the start.
    ///
    /// # Arguments
    /// * `host` - Host solver (modified in place)
    /// * `t_start` - Starting time
    /// * `t_end` - Ending time
    /// * `callback` - Function called with (host, time) at each callback point
    ///
    /// # Errors
    /// The first cycle error, or [`RklError::Configuration`] for a
    /// non-positive cycle length or an exhausted cycle limit.
    pub fn run_with_callback<H, F>(
        &mut self,
        host: &mut H,
        t_start: f64,
        t_end: f64,
        mut callback: F,
    ) -> Result<SimulationResult>
    where
        H: ParabolicHost + ?Sized,
        F: FnMut(&H, f64),
    {
        let dt_cycle = self.config.dt_cycle;
        if !(dt_cycle > 0.0) || !dt_cycle.is_finite() {
            return Err(RklError::configuration(format!(
                "cycle length must be positive, got {}",
                dt_cycle
            )));
        }

        let start_wall = std::time::Instant::now();
        let mut t = t_start;
        let mut result = SimulationResult {
            final_time: t_start,
            n_cycles: 0,
            total_stages: 0,
            max_stages: 0,
            dt_parabolic_min: f64::INFINITY,
            wall_time: 0.0,
        };
        let mut last_callback_time = t_start;

        callback(host, t);
        tracing::info!(t_start, t_end, dt_cycle, "Starting RKL run");

        while t < t_end {
            if let Some(max_cycles) = self.config.max_cycles
                && result.n_cycles >= max_cycles
            {
                return Err(RklError::configuration(format!(
                    "maximum cycle limit ({}) reached at t = {}",
                    max_cycles, t
                )));
            }

            let dt = dt_cycle.min(t_end - t);
            let report = self.integrator.run_cycle(host, t, dt)?;

            t = if t_end - t <= dt_cycle { t_end } else { t + dt };
            result.n_cycles += 1;
            result.total_stages += report.stages;
            result.max_stages = result.max_stages.max(report.stages);
            result.dt_parabolic_min = result.dt_parabolic_min.min(report.dt_parabolic);

            let should_callback = match self.config.callback_interval {
                Some(interval) => t - last_callback_time >= interval || t >= t_end,
                None => true,
            };
            if should_callback {
                callback(host, t);
                last_callback_time = t;
                tracing::debug!(
                    t,
                    cycles = result.n_cycles,
                    stages = report.stages,
                    "RKL run progress"
                );
            }
        }

        result.final_time = t;
        result.wall_time = start_wall.elapsed().as_secs_f64();
        tracing::info!(
            cycles = result.n_cycles,
            mean_stages = result.mean_stages(),
            wall_time = result.wall_time,
            "Finished RKL run"
        );
        Ok(result)
    }
}
