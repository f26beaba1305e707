//! Temperature System - heat diffusion and phase changes
//!
//! - Heat flows between a cell and each cardinal neighbor, scaled by the lower of the two
//!   conductivities and damped by density
//! - Phase changes (melting, freezing, boiling, condensing) swap the element and keep the
//!   cell's temperature

mod diffusion;
mod phase_change;

pub use diffusion::diffuse;
pub use phase_change::{apply_phase_change, check_phase_change};
