//! Error types for super-time-stepping.

use thiserror::Error;

use crate::types::Direction;

/// Errors raised by the RKL integrator and its collaborators.
///
/// Every variant is fatal for the current run: nothing is retried or clamped
/// internally. The only recoverable configuration path (a missing CFL number)
/// is handled by defaulting in [`RklConfig`](crate::config::RklConfig) and is
/// never reported through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RklError {
    /// A configuration entry is present but malformed or out of range.
    #[error("Invalid RKL configuration: {0}")]
    Configuration(String),

    /// A user-defined coefficient or boundary function was requested but
    /// never supplied.
    #[error("User-defined {what} requested but no function was enrolled")]
    UnenrolledPhysics { what: String },

    /// Non-positive or non-finite input to the stage estimator.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reduced inverse-timestep bound is zero or non-finite.
    #[error("Divergent parabolic timestep: reduced inverse-dt bound is {max_inv_dt}")]
    DivergentTimestep { max_inv_dt: f64 },

    /// The stability estimate needs more stages than the configured limit.
    #[error("RKL cycle needs {required} stages but at most {limit} are allowed")]
    StageLimitExceeded { required: usize, limit: usize },

    /// A cycle was started before the previous one reached `Done`.
    #[error("An RKL cycle is already in progress (stage {stage})")]
    CycleInProgress { stage: usize },

    /// A field does not match the grid it is used with.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: [usize; 4],
        actual: [usize; 4],
    },

    /// A direction was requested that the grid does not evolve.
    #[error("Direction {0} is not active on this grid")]
    InactiveDirection(Direction),
}

impl RklError {
    /// Create an unenrolled-physics error.
    pub fn unenrolled(what: impl Into<String>) -> Self {
        Self::UnenrolledPhysics { what: what.into() }
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RklError>;
