//! Runge-Kutta-Legendre stage coefficients.
//!
//! An `s`-stage RKL cycle is the three-term recursion
//!
//! ```text
//! Y_1 = Y_0 + mu~_1 dt L(Y_0)
//! Y_j = mu_j Y_{j-1} + nu_j Y_{j-2} + (1 - mu_j - nu_j) Y_0
//!       + mu~_j dt L(Y_{j-1}) + gamma_j dt L(Y_0)
//! ```
//!
//! whose coefficients follow from the shifted Legendre polynomials. The
//! first-order variant drops the `Y_0` and `L(Y_0)` terms.
//!
//! The coefficients are produced by the same floating-point operations, in
//! the same order, as the reference formulation, so two runs of the same
//! cycle agree bit for bit.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RklError};

// =============================================================================
// Order
// =============================================================================

/// Temporal order of the RKL recursion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RklOrder {
    /// RKL1: stable for `s² + s ≥ 2 dt/dt_par`.
    First,
    /// RKL2: stable for `s² + s - 2 ≥ 4 dt/dt_par`.
    #[default]
    Second,
}

impl RklOrder {
    /// Numeric order (1 or 2).
    pub fn as_usize(self) -> usize {
        match self {
            RklOrder::First => 1,
            RklOrder::Second => 2,
        }
    }

    /// Smallest stage count this order is defined for.
    pub fn min_stages(self) -> usize {
        match self {
            RklOrder::First => 1,
            RklOrder::Second => 2,
        }
    }
}

impl fmt::Display for RklOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RKL{}", self.as_usize())
    }
}

impl FromStr for RklOrder {
    type Err = RklError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(RklOrder::First),
            "2" => Ok(RklOrder::Second),
            other => Err(RklError::configuration(format!(
                "RKL order must be 1 or 2, got '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Coefficients
// =============================================================================

/// Coefficients of one RKL stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageCoefficients {
    /// Stage number, starting at 1
    pub stage: usize,
    /// Weight of the previous stage
    pub mu: f64,
    /// Weight of the previous stage's derivative
    pub mu_tilde: f64,
    /// Weight of the stage before the previous one
    pub nu: f64,
    /// Weight of the first-stage derivative
    pub gamma: f64,
}

/// Generator of the stage coefficients of one `s`-stage cycle.
///
/// [`first`](RklRecursion::first) gives stage 1; iterating yields stages
/// `2..=s` in order. The iterator carries the `b_j` state of the second-order
/// recursion, so each stage must be consumed exactly once.
///
/// # Example
///
/// ```
/// use rkl_rs::time::{RklOrder, RklRecursion};
///
/// let mut recursion = RklRecursion::new(RklOrder::Second, 5).unwrap();
/// let first = recursion.first();
/// assert!((first.mu_tilde - recursion.w1() / 3.0).abs() < 1e-15);
///
/// let stages: Vec<_> = recursion.by_ref().map(|c| c.stage).collect();
/// assert_eq!(stages, vec![2, 3, 4, 5]);
/// ```
#[derive(Clone, Debug)]
pub struct RklRecursion {
    order: RklOrder,
    stages: usize,
    next: usize,
    w1: f64,
    b_j: f64,
    b_jm1: f64,
    b_jm2: f64,
    a_jm1: f64,
}

impl RklRecursion {
    /// Start the recursion for an `stages`-stage cycle.
    pub fn new(order: RklOrder, stages: usize) -> Result<Self> {
        if stages < order.min_stages() {
            return Err(RklError::InvalidInput(format!(
                "{} needs at least {} stages, got {}",
                order,
                order.min_stages(),
                stages
            )));
        }

        let s = stages;
        let w1 = match order {
            RklOrder::First => 2.0 / (s * s + s) as f64,
            RklOrder::Second => 4.0 / ((s * s + s) as f64 - 2.0),
        };
        let third = 1.0 / 3.0;

        Ok(Self {
            order,
            stages,
            next: 2,
            w1,
            b_j: third,
            b_jm1: third,
            b_jm2: third,
            a_jm1: 1.0 - third,
        })
    }

    /// Order of the recursion.
    pub fn order(&self) -> RklOrder {
        self.order
    }

    /// Total number of stages.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Scaling factor `w1`.
    pub fn w1(&self) -> f64 {
        self.w1
    }

    /// Current `b_j` (second order).
    pub fn b(&self) -> f64 {
        self.b_j
    }

    /// Current `b_{j-1}` (second order).
    pub fn b_prev(&self) -> f64 {
        self.b_jm1
    }

    /// Current `a_{j-1}` (second order).
    pub fn a_prev(&self) -> f64 {
        self.a_jm1
    }

    /// Coefficients of stage 1. Only `mu_tilde` is used by the first stage.
    pub fn first(&self) -> StageCoefficients {
        let mu_tilde = match self.order {
            RklOrder::First => self.w1,
            RklOrder::Second => self.w1 / 3.0,
        };
        StageCoefficients {
            stage: 1,
            mu: 0.0,
            mu_tilde,
            nu: 0.0,
            gamma: 0.0,
        }
    }

    /// Time reached at the end of stage `stage`, for a cycle of length `dt`
    /// starting at `t0`.
    ///
    /// Stage `j` evaluates boundaries and fluxes at `stage_time(t0, j - 1, dt)`.
    pub fn stage_time(&self, t0: f64, stage: usize, dt: f64) -> f64 {
        let j = stage;
        match self.order {
            RklOrder::First => t0 + 0.5 * dt * (j * j + j) as f64 * self.w1,
            RklOrder::Second => t0 + 0.25 * dt * ((j * j + j) as f64 - 2.0) * self.w1,
        }
    }

    fn advance(&mut self, stage: usize) -> StageCoefficients {
        let j = stage as f64;
        match self.order {
            RklOrder::First => {
                let mu = (2.0 * j - 1.0) / j;
                StageCoefficients {
                    stage,
                    mu,
                    mu_tilde: self.w1 * mu,
                    nu: -(j - 1.0) / j,
                    gamma: 0.0,
                }
            }
            RklOrder::Second => {
                let mu = (2.0 * j - 1.0) / j * self.b_j / self.b_jm1;
                let mu_tilde = self.w1 * mu;
                let gamma = -self.a_jm1 * mu_tilde;
                let nu = -(j - 1.0) * self.b_j / (j * self.b_jm2);

                self.b_jm2 = self.b_jm1;
                self.b_jm1 = self.b_j;
                self.a_jm1 = 1.0 - self.b_jm1;
                let jj = (stage * stage) as f64;
                self.b_j = 0.5 * (jj + 3.0 * j) / (jj + 3.0 * j + 2.0);

                StageCoefficients {
                    stage,
                    mu,
                    mu_tilde,
                    nu,
                    gamma,
                }
            }
        }
    }
}

impl Iterator for RklRecursion {
    type Item = StageCoefficients;

    fn next(&mut self) -> Option<StageCoefficients> {
        if self.next > self.stages {
            return None;
        }
        let stage = self.next;
        self.next += 1;
        Some(self.advance(stage))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.stages + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RklRecursion {}
