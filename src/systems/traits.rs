//! Reference System Traits: Standardized API for Known Reaction Networks
//!
//! Textbook reaction-diffusion models come with closed-form steady states
//! and, often, closed-form instability thresholds. This module defines the
//! traits that let them feed the screening pipeline and check it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ReferenceSystem Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + model()             - Species, stoichiometry, rates      │
//! │  + reaction_params()   - Current parameters (model order)   │
//! │  + diffusion()         - Current diffusion constants        │
//! │  + steady_state()      - Analytic homogeneous equilibrium   │
//! │  + parameter_set()     - Single-valued ParameterSet         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::error::TuringResult;
use crate::model::ReactionModel;
use crate::params::ParameterSet;

/// Reaction network with known parameters and (usually) a known steady state
pub trait ReferenceSystem {
    /// Short name for reports
    fn name(&self) -> &'static str;

    /// Build the reaction model
    fn model(&self) -> TuringResult<ReactionModel>;

    /// Current reaction parameters, in model parameter order
    fn reaction_params(&self) -> Vec<f64>;

    /// Current diffusion constants, in model species order
    fn diffusion(&self) -> Vec<f64>;

    /// Closed-form homogeneous steady state, if one is known
    fn steady_state(&self) -> Option<Vec<f64>> {
        None
    }

    /// Single-valued parameter set seeded at the analytic steady state
    ///
    /// Species without a closed-form steady state start from the default
    /// initial concentration.
    fn parameter_set(&self) -> TuringResult<ParameterSet> {
        let model = self.model()?;
        let mut params = ParameterSet::new();
        for (name, value) in model.parameters().iter().zip(self.reaction_params()) {
            params = params.with_reaction(name, [value]);
        }
        for (name, d) in model.species().iter().zip(self.diffusion()) {
            params = params.with_diffusion(name, [d]);
        }
        if let Some(ss) = self.steady_state() {
            for (name, c) in model.species().iter().zip(ss) {
                params = params.with_initial_condition(name, [c]);
            }
        }
        Ok(params)
    }
}

/// Trait for systems with a known instability threshold
pub trait Bifurcating: ReferenceSystem {
    /// Theoretical critical value of the control parameter (if known)
    fn critical_parameter(&self) -> Option<f64> {
        None
    }

    /// Name of the bifurcation type
    fn bifurcation_type(&self) -> &'static str;
}
