//! Dense field storage on the ghost-inclusive structured grid.
//!
//! # Submodules
//!
//! - [`GridField`]: multi-component `(component, k, j, i)` arrays
//! - [`CellField`]: scalar `(k, j, i)` arrays
//! - [`RklBuffers`]: the named snapshots owned by the RKL integrator
//!
//! All loops over fields walk contiguous `i`-rows; with the `parallel`
//! feature enabled the rows are distributed over the rayon thread pool.

mod cell_field;
mod grid_field;
mod rows;
mod snapshots;

pub use cell_field::CellField;
pub use grid_field::GridField;
pub use snapshots::RklBuffers;

pub(crate) use rows::{for_each_row, for_each_row_pair, reduce_rows};
