//! Reference Systems: Classic Reaction-Diffusion Models
//!
//! Prototype networks for validating the screening pipeline against
//! closed-form results:
//!
//! - **Brusselator**: Hopf and Turing thresholds in closed form
//! - **Schnakenberg**: Activator–depleted substrate, anti-phase patterns
//! - **Gierer–Meinhardt**: Activator–inhibitor, in-phase patterns
//! - **Lengyel–Epstein**: CIMA reaction
//! - **GDF5–NOG**: Four-species digit-joint network with Hill feedback

mod traits;
mod brusselator;
mod schnakenberg;
mod gierer_meinhardt;
mod lengyel_epstein;
mod gdf5_nog;

pub use traits::{Bifurcating, ReferenceSystem};
pub use brusselator::Brusselator;
pub use schnakenberg::Schnakenberg;
pub use gierer_meinhardt::GiererMeinhardt;
pub use lengyel_epstein::LengyelEpstein;
pub use gdf5_nog::{Gdf5Nog, GDF5_NOG_PARAMETERS};
