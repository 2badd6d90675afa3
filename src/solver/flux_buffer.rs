//! Scratch buffers exchanged with the diffusive physics.

use crate::field::{CellField, GridField};

/// Face quantities of one direction, refilled for every direction of every
/// stage.
///
/// Component `c` of `flux` at a cell is the flux of diffused component
/// `c` through that cell's *left* face. `d_max` at a cell is the diffusion
/// signal (diffusivity over density) on the same face.
#[derive(Clone, Debug)]
pub struct ParabolicFlux {
    /// Face fluxes of the diffused block
    pub flux: GridField,
    /// Diffusion signal on left faces
    pub d_max: CellField,
    source: GridField,
    source_active: bool,
}

impl ParabolicFlux {
    /// Allocate buffers for `n_components` diffused components.
    pub fn new(n_components: usize, shape: [usize; 3]) -> Self {
        Self {
            flux: GridField::new(n_components, shape),
            d_max: CellField::new(shape),
            source: GridField::new(n_components, shape),
            source_active: false,
        }
    }

    /// Zero the fluxes and the signal, and drop the source term.
    pub fn reset(&mut self) {
        self.flux.fill(0.0);
        self.d_max.fill(0.0);
        if self.source_active {
            self.source.fill(0.0);
            self.source_active = false;
        }
    }

    /// Cell-centred source term, marked as present for this direction.
    pub fn source_mut(&mut self) -> &mut GridField {
        self.source_active = true;
        &mut self.source
    }

    /// The source term, if one was supplied since the last reset.
    pub fn source(&self) -> Option<&GridField> {
        self.source_active.then_some(&self.source)
    }

    /// Whether a source term was supplied since the last reset.
    pub fn has_source(&self) -> bool {
        self.source_active
    }

    /// Number of diffused components.
    pub fn n_components(&self) -> usize {
        self.flux.n_var
    }
}
