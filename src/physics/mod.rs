//! Diffusive physics.
//!
//! # Key Types
//!
//! - [`DiffusivityConfig`]: requested coefficient, validated by
//!   [`PhysicsConfig::build`]
//! - [`DiffusivityStatus`]: the validated coefficient
//! - [`VectorDiffusion`]: face fluxes of a diffused vector block
//!
//! # Example
//! ```
//! use rkl_rs::physics::{DiffusivityConfig, DiffusivityContext, PhysicsConfig};
//!
//! let status = DiffusivityConfig::user_defined()
//!     .enroll(|ctx: &DiffusivityContext| 1e-3 * ctx.density * ctx.x[0])
//!     .build()
//!     .unwrap();
//! assert!(status.is_enabled());
//!
//! // Requesting a user coefficient without supplying one fails at build time.
//! assert!(DiffusivityConfig::user_defined().build().is_err());
//! ```

mod diffusivity;
mod vector_diffusion;

pub use diffusivity::{
    DiffusivityConfig, DiffusivityContext, DiffusivityFn, DiffusivityKind, DiffusivityStatus,
};
pub use vector_diffusion::VectorDiffusion;

use crate::error::Result;

/// Configuration that is validated when the physics is built.
pub trait PhysicsConfig: Clone {
    /// The type of physics module produced by this configuration.
    type Module;

    /// Validate and build the physics module.
    fn build(self) -> Result<Self::Module>;
}
