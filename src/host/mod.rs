//! Host solver interface and a reference diffusion host.
//!
//! - [`ParabolicHost`]: what the integrator calls on the surrounding solver
//! - [`SolverMode`]: hyperbolic step or parabolic stage, passed to every call
//! - [`DiffusionHost`]: density plus a diffused vector, for standalone use

mod diffusion_host;
mod traits;

pub use diffusion_host::DiffusionHost;
pub use traits::{ParabolicHost, SolverMode};
