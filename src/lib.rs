//! # turing-screen
//!
//! Turing-Instability Screening and Simulation of Reaction-Diffusion
//! Networks
//!
//! ## Theoretical Framework
//!
//! A reaction network with N species, stoichiometry S and rate laws r(C, p),
//! extended by diffusion in one spatial dimension:
//!
//!   ∂C/∂t = S · r(C, p) + D ∂²C/∂x²
//!
//! A homogeneous steady state C* that is stable without diffusion can be
//! destabilized by it when species diffuse at sufficiently different rates
//! (Turing, 1952). Linearizing with perturbations ∝ exp(iqx + λt) gives the
//! dispersion relation
//!
//!   λ(q) = max Re eig(J − q² D)
//!
//! and a stationary pattern of wavelength 2π/q* grows when λ(q*) > 0 while
//! λ(0) < 0.
//!
//! ### Pipeline
//!
//! 1. **Steady state**: integrate the well-mixed kinetics until the rates
//!    vanish (stiff-aware adaptive integrator)
//!
//! 2. **Stability**: scan λ(q) over wavenumbers, classify, and extract the
//!    dominant wavelength and the relative phase of each species
//!
//! 3. **Sweep**: repeat 1–2 over every combination of candidate parameter
//!    values, in parallel batches
//!
//! 4. **Simulation**: integrate the full nonlinear PDE for a selected
//!    combination to see the saturated pattern
//!
//! ## Example
//!
//! ```ignore
//! use turing_screen::{ParameterSweep, ParameterSet, ReferenceSystem, Schnakenberg, SweepOptions};
//!
//! let model = Schnakenberg::default().model()?;
//! let params = ParameterSet::new()
//!     .with_reaction("a", screen_values(0.05, 0.3, 10, ScreenMode::Linear)?)
//!     .with_reaction("b", screen_values(0.5, 2.0, 10, ScreenMode::Linear)?)
//!     .with_diffusion("u", [1.0])
//!     .with_diffusion("v", [10.0, 40.0]);
//! let result = ParameterSweep::new(&model, &params, SweepOptions::default())?.run()?;
//! ```
//!
//! ## References
//!
//! - Turing, A. M. (1952). The chemical basis of morphogenesis.
//!   Phil. Trans. R. Soc. B.
//! - Murray, J. D. (2003). Mathematical Biology II: Spatial Models and
//!   Biomedical Applications. Springer.

pub mod error;
pub mod model;
pub mod params;
pub mod integrate;
pub mod steady_state;
pub mod stability;
pub mod sweep;
pub mod pde;
pub mod systems;

// Re-exports from error
pub use error::{ConvergenceFailure, TuringError, TuringResult};

// Re-exports from model
pub use model::{
    kinetics::{hill, hillr},
    ReactionModel,
    ReactionModelBuilder,
};

// Re-exports from params
pub use params::{
    screen_values,
    OdeAlgorithm,
    ParamKind,
    ParameterSet,
    Sampling,
    ScreenMode,
    SimulationOptions,
    StabilityOptions,
    SweepOptions,
};

// Re-exports from steady_state / stability
pub use steady_state::{SteadyState, SteadyStateSolver};
pub use stability::{Classification, StabilityAnalyzer, StabilityReport};

// Re-exports from sweep
pub use sweep::{
    get_param,
    get_params,
    ParameterSweep,
    SweepResult,
    SweepSummary,
    TuringRecord,
};

// Re-exports from pde
pub use pde::{PdeSimulator, SimulationConfig, SimulationStatus, Trajectory};

// Re-exports from systems
pub use systems::{
    // Traits
    ReferenceSystem,
    Bifurcating,
    // Models
    Brusselator,
    Schnakenberg,
    GiererMeinhardt,
    LengyelEpstein,
    Gdf5Nog,
};
