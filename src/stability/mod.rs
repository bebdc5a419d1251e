//! Stability Analysis: Diffusion-Driven Instability Classification
//!
//! Given a steady state C*, reaction parameters and diffusion constants,
//! decides whether the homogeneous state is destabilized by diffusion and,
//! if so, reports the dominant wavelength, whether the fastest-growing mode
//! oscillates, and the relative phase of each species in the pattern.
//!
//! ## Classification
//!
//! | q = 0 stable | some q > 0 unstable | Result                     |
//! |--------------|---------------------|----------------------------|
//! | yes          | yes                 | `TuringUnstable`           |
//! | yes          | no                  | `Stable`                   |
//! | no           | any                 | `UnstableWithoutDiffusion` |
//! | yes          | (nothing diffuses)  | `NoDiffusion`              |
//! | yes          | yes, peak at q_max  | `ShortWaveUnstable`        |
//!
//! Only `TuringUnstable` carries a wavelength and a pattern phase.

mod analyzer;
mod phase;

pub use analyzer::{dispersion_curve, Classification, StabilityAnalyzer, StabilityReport};
pub use phase::{canonical_phase, dominant_eigenvector};
