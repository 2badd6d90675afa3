//! Named snapshots owned by the RKL integrator.
//!
//! The recursion needs five arrays per cycle: the live host state `Uc` (borrowed)
//! plus the four owned snapshots below. Each has exactly one writer per stage:
//!
//! | snapshot | written                       | read                       |
//! |----------|-------------------------------|----------------------------|
//! | `uc0`    | once, at cycle start          | every stage update         |
//! | `du`     | every stage (RHS pass)        | the same stage's update    |
//! | `du0`    | once, after the stage-1 pass  | every stage update         |
//! | `uc1`    | every stage update (rotation) | the next stage's update    |

use super::{CellField, GridField};

/// Fixed set of snapshot buffers for one RKL integrator.
///
/// Allocated once with the shape of the host conservative field and never
/// resized.
#[derive(Clone, Debug)]
pub struct RklBuffers {
    /// State at the start of the cycle (`Uc0`).
    pub uc0: GridField,
    /// State of the previous stage (`Uc1`).
    pub uc1: GridField,
    /// Stage derivative, accumulated over directions (`dU`).
    pub du: GridField,
    /// Derivative of the first stage (`dU0`).
    pub du0: GridField,
    /// Per-cell inverse parabolic timestep bound.
    pub inv_dt: CellField,
}

impl RklBuffers {
    /// Allocate zeroed buffers for `n_var` variables on a `[nk, nj, ni]` grid.
    pub fn new(n_var: usize, shape: [usize; 3]) -> Self {
        let field = GridField::new(n_var, shape);
        Self {
            uc0: field.clone(),
            uc1: field.clone(),
            du: field.clone(),
            du0: field,
            inv_dt: CellField::new(shape),
        }
    }

    /// `[n_var, nk, nj, ni]` of every state-shaped buffer.
    pub fn dims(&self) -> [usize; 4] {
        self.du.dims()
    }

    /// Zero the stage derivative and the inverse-timestep bound.
    pub fn reset_stage(&mut self) {
        self.du.fill(0.0);
        self.inv_dt.fill(0.0);
    }

    /// Record the cycle's starting state.
    pub fn snapshot_initial(&mut self, uc: &GridField) {
        self.uc0.copy_from(uc);
    }

    /// Freeze the stage-1 derivative into `du0`.
    pub fn freeze_derivative(&mut self) {
        self.du0.copy_from(&self.du);
    }
}
