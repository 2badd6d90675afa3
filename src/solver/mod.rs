//! Parabolic right-hand side.
//!
//! # Submodules
//!
//! - [`ParabolicFlux`]: per-direction face fluxes, diffusion signal and
//!   optional source term filled by the host's diffusive physics
//! - [`accumulate_parabolic_rhs`]: divergence of those fluxes into the stage
//!   derivative, with curvature corrections and the stage-1 timestep bound

mod flux_buffer;
mod parabolic_rhs;

pub use flux_buffer::ParabolicFlux;
pub use parabolic_rhs::accumulate_parabolic_rhs;
