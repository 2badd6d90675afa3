//! Integrator configuration.
//!
//! Values usually come from the `[RKL]` section of an input file and are
//! passed to [`RklConfig::from_entries`] as `(key, value)` pairs:
//!
//! ```text
//! [RKL]
//! cfl         0.5
//! order       2
//! max_stages  200
//! ```

use crate::error::{Result, RklError};
use crate::time::RklOrder;

/// CFL number used when none is configured.
pub const DEFAULT_CFL: f64 = 0.5;

/// Configuration of an [`RklIntegrator`](crate::time::RklIntegrator).
///
/// # Example
///
/// ```
/// use rkl_rs::config::RklConfig;
/// use rkl_rs::time::RklOrder;
///
/// let config = RklConfig::default()
///     .with_cfl(0.4)
///     .with_order(RklOrder::First)
///     .with_max_stages(64);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.resolved_cfl().unwrap(), 0.4);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RklConfig {
    /// CFL number of the parabolic timestep; [`DEFAULT_CFL`] when unset.
    pub cfl: Option<f64>,
    /// Temporal order of the recursion.
    pub order: RklOrder,
    /// Largest stage count a cycle may use (unbounded when unset).
    pub max_stages: Option<usize>,
}

impl RklConfig {
    /// Set the CFL number.
    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = Some(cfl);
        self
    }

    /// Set the temporal order.
    pub fn with_order(mut self, order: RklOrder) -> Self {
        self.order = order;
        self
    }

    /// Bound the number of stages per cycle.
    pub fn with_max_stages(mut self, max_stages: usize) -> Self {
        self.max_stages = Some(max_stages);
        self
    }

    /// The CFL number to use, defaulting (with a warning) when unset.
    pub fn resolved_cfl(&self) -> Result<f64> {
        match self.cfl {
            None => {
                tracing::warn!(default = DEFAULT_CFL, "No RKL cfl configured, using the default");
                Ok(DEFAULT_CFL)
            }
            Some(cfl) if cfl > 0.0 && cfl.is_finite() => Ok(cfl),
            Some(cfl) => Err(RklError::configuration(format!(
                "cfl must be positive and finite, got {}",
                cfl
            ))),
        }
    }

    /// Check every configured value.
    pub fn validate(&self) -> Result<()> {
        if let Some(cfl) = self.cfl
            && !(cfl > 0.0 && cfl.is_finite())
        {
            return Err(RklError::configuration(format!(
                "cfl must be positive and finite, got {}",
                cfl
            )));
        }
        if let Some(max) = self.max_stages
            && max < self.order.min_stages()
        {
            return Err(RklError::configuration(format!(
                "max_stages = {} is below the {} minimum of {}",
                max,
                self.order,
                self.order.min_stages()
            )));
        }
        Ok(())
    }

    /// Parse `(key, value)` entries of an input section.
    ///
    /// Recognised keys are `cfl`, `order` and `max_stages`. Unknown keys are
    /// ignored with a warning; malformed values are errors.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in entries {
            let value = value.trim();
            match key.trim() {
                "cfl" => {
                    let cfl = value.parse::<f64>().map_err(|_| {
                        RklError::configuration(format!("cannot parse cfl '{}'", value))
                    })?;
                    config.cfl = Some(cfl);
                }
                "order" => config.order = value.parse()?,
                "max_stages" => {
                    let max = value.parse::<usize>().map_err(|_| {
                        RklError::configuration(format!("cannot parse max_stages '{}'", value))
                    })?;
                    config.max_stages = Some(max);
                }
                other => tracing::warn!(key = other, "Ignoring unknown RKL entry"),
            }
        }
        config.validate()?;
        Ok(config)
    }
}
