//! Diffusion coefficients.
//!
//! A coefficient is configured as a [`DiffusivityConfig`] (typically parsed
//! from input) and turned into a [`DiffusivityStatus`] by
//! [`build`](DiffusivityConfig::build), which is where a user-defined
//! coefficient without an enrolled function is rejected.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::PhysicsConfig;
use crate::error::{Result, RklError};

/// Where and when a coefficient is evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusivityContext {
    /// Cell centre `(x1, x2, x3)`
    pub x: [f64; 3],
    /// Evaluation time
    pub time: f64,
    /// Density at the cell centre
    pub density: f64,
}

/// User coefficient function.
pub type DiffusivityFn = Arc<dyn Fn(&DiffusivityContext) -> f64 + Send + Sync>;

// =============================================================================
// Status
// =============================================================================

/// A validated diffusion coefficient.
#[derive(Clone, Default)]
pub enum DiffusivityStatus {
    /// No diffusion.
    #[default]
    Disabled,
    /// Uniform coefficient.
    Constant(f64),
    /// Coefficient computed per cell.
    UserDefined(DiffusivityFn),
}

impl DiffusivityStatus {
    /// Whether any diffusion is applied.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, DiffusivityStatus::Disabled)
    }

    /// Coefficient at `ctx` (zero when disabled).
    #[inline]
    pub fn eval(&self, ctx: &DiffusivityContext) -> f64 {
        match self {
            DiffusivityStatus::Disabled => 0.0,
            DiffusivityStatus::Constant(eta) => *eta,
            DiffusivityStatus::UserDefined(f) => f(ctx),
        }
    }
}

impl fmt::Debug for DiffusivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffusivityStatus::Disabled => f.write_str("Disabled"),
            DiffusivityStatus::Constant(eta) => f.debug_tuple("Constant").field(eta).finish(),
            DiffusivityStatus::UserDefined(_) => f.write_str("UserDefined(..)"),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// How a coefficient was requested.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DiffusivityKind {
    /// `none`
    #[default]
    None,
    /// `constant <value>`
    Constant(f64),
    /// `userdef`
    UserDefined,
}

impl FromStr for DiffusivityKind {
    type Err = RklError;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let kind = match (words.next(), words.next()) {
            (Some("none"), None) => DiffusivityKind::None,
            (Some("userdef"), None) => DiffusivityKind::UserDefined,
            (Some("constant"), Some(value)) => {
                let eta = value.parse::<f64>().map_err(|_| {
                    RklError::configuration(format!("cannot parse diffusivity '{}'", value))
                })?;
                DiffusivityKind::Constant(eta)
            }
            _ => {
                return Err(RklError::configuration(format!(
                    "diffusivity must be 'none', 'constant <value>' or 'userdef', got '{}'",
                    s.trim()
                )));
            }
        };
        if words.next().is_some() {
            return Err(RklError::configuration(format!(
                "trailing values in diffusivity '{}'",
                s.trim()
            )));
        }
        Ok(kind)
    }
}

/// Unvalidated coefficient request plus an optional enrolled function.
#[derive(Clone, Default)]
pub struct DiffusivityConfig {
    /// Requested coefficient
    pub kind: DiffusivityKind,
    user: Option<DiffusivityFn>,
}

impl DiffusivityConfig {
    /// Request no diffusion.
    pub fn none() -> Self {
        Self::default()
    }

    /// Request a uniform coefficient.
    pub fn constant(eta: f64) -> Self {
        Self {
            kind: DiffusivityKind::Constant(eta),
            user: None,
        }
    }

    /// Request a user-defined coefficient; see [`enroll`](Self::enroll).
    pub fn user_defined() -> Self {
        Self {
            kind: DiffusivityKind::UserDefined,
            user: None,
        }
    }

    /// Supply the function used by a user-defined coefficient.
    pub fn enroll<F>(mut self, f: F) -> Self
    where
        F: Fn(&DiffusivityContext) -> f64 + Send + Sync + 'static,
    {
        self.user = Some(Arc::new(f));
        self
    }
}

impl PhysicsConfig for DiffusivityConfig {
    type Module = DiffusivityStatus;

    fn build(self) -> Result<DiffusivityStatus> {
        match self.kind {
            DiffusivityKind::None => Ok(DiffusivityStatus::Disabled),
            DiffusivityKind::Constant(eta) if eta >= 0.0 && eta.is_finite() => {
                Ok(DiffusivityStatus::Constant(eta))
            }
            DiffusivityKind::Constant(eta) => Err(RklError::configuration(format!(
                "diffusivity must be non-negative and finite, got {}",
                eta
            ))),
            DiffusivityKind::UserDefined => self
                .user
                .map(DiffusivityStatus::UserDefined)
                .ok_or_else(|| RklError::unenrolled("diffusivity")),
        }
    }
}

impl fmt::Debug for DiffusivityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffusivityConfig")
            .field("kind", &self.kind)
            .field("enrolled", &self.user.is_some())
            .finish()
    }
}
