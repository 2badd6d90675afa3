//! Repeated RKL cycles up to a final time.
//!
//! For problems where the parabolic terms are the whole evolution (or the
//! hyperbolic step is taken elsewhere with a fixed length), [`Simulation`]
//! runs one RKL cycle per step and collects stage statistics.
//!
//! # Example
//! ```ignore
//! use rkl_rs::simulation::Simulation;
//!
//! let result = Simulation::new(integrator)
//!     .with_dt_cycle(0.1)
//!     .with_callback_interval(1.0)
//!     .run_with_callback(&mut host, 0.0, 10.0, |host, t| println!("t = {:.2}", t))?;
//! ```

mod runner;

pub use runner::{Simulation, SimulationConfig, SimulationResult};
