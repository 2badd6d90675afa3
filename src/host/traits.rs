//! Host solver interface.
//!
//! The integrator drives the host's boundary, conversion and flux routines
//! through [`ParabolicHost`] and never touches the host's primitive state.

use std::fmt;

use crate::error::Result;
use crate::field::GridField;
use crate::solver::ParabolicFlux;
use crate::time::CycleReport;
use crate::types::Direction;

// =============================================================================
// SolverMode
// =============================================================================

/// Which integrator is calling the host.
///
/// Passed to every host call so physics can tell a parabolic stage from a
/// hyperbolic step without a shared flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SolverMode {
    /// Ordinary hyperbolic step.
    #[default]
    Hyperbolic,
    /// Stage `stage` (starting at 1) of an RKL cycle.
    Parabolic { stage: usize },
}

impl SolverMode {
    /// Whether an RKL cycle is running.
    pub fn is_parabolic(self) -> bool {
        matches!(self, SolverMode::Parabolic { .. })
    }

    /// RKL stage, if any.
    pub fn stage(self) -> Option<usize> {
        match self {
            SolverMode::Hyperbolic => None,
            SolverMode::Parabolic { stage } => Some(stage),
        }
    }
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMode::Hyperbolic => f.write_str("hyperbolic"),
            SolverMode::Parabolic { stage } => write!(f, "parabolic stage {}", stage),
        }
    }
}

// =============================================================================
// ParabolicHost Trait
// =============================================================================

/// Capabilities the RKL integrator needs from the solver it is embedded in.
///
/// The host owns the primitive and conservative state. During a cycle the
/// integrator updates the conservative state through
/// [`conservative_mut`](ParabolicHost::conservative_mut) and asks the host to
/// keep the primitive state in sync.
///
/// # Example Implementation
///
/// ```ignore
/// impl ParabolicHost for MyHydro {
///     fn parabolic_flux(&mut self, dir: Direction, time: f64, mode: SolverMode,
///                       out: &mut ParabolicFlux) -> Result<()> {
///         self.viscosity.compute_flux(&self.grid, &self.vc, dir, time, out)
///     }
///     // ...
/// }
/// ```
pub trait ParabolicHost {
    /// Fill ghost cells of the primitive state at `time`.
    fn apply_boundary(&mut self, time: f64, mode: SolverMode) -> Result<()>;

    /// Update the conservative state from the primitive state.
    fn prim_to_cons(&mut self, mode: SolverMode);

    /// Update the primitive state from the conservative state.
    fn cons_to_prim(&mut self, mode: SolverMode);

    /// Conservative state `Uc`.
    fn conservative(&self) -> &GridField;

    /// Mutable conservative state.
    fn conservative_mut(&mut self) -> &mut GridField;

    /// Compute the diffusive face fluxes of direction `dir` into `out`.
    ///
    /// `out` has been reset. The host fills `out.flux` for every diffused
    /// component on the faces `beg..=end` along `dir`, `out.d_max` on the
    /// same faces, and optionally a source term through
    /// [`ParabolicFlux::source_mut`].
    ///
    /// # Arguments
    /// * `dir` - Direction of the face normals
    /// * `time` - Time at which boundary data and coefficients are evaluated
    /// * `mode` - Current RKL stage
    /// * `out` - Buffers to fill
    fn parabolic_flux(
        &mut self,
        dir: Direction,
        time: f64,
        mode: SolverMode,
        out: &mut ParabolicFlux,
    ) -> Result<()>;

    /// Called once after the last stage of a successful cycle.
    ///
    /// Default implementation does nothing.
    fn end_parabolic_cycle(&mut self, _report: &CycleReport) {
        // Default: nothing to finalise
    }
}
