//! GDF5–NOG: Digit Joint Patterning Network
//!
//! Ligand GDF5 and its antagonist NOG bind into an inactive COMPLEX;
//! free GDF5 drives SMAD phosphorylation, and pSMAD represses transcription
//! of both ligand and antagonist:
//!
//! ```text
//!   GDF5 + NOG ⇌ COMPLEX          (k₊, k₋)
//!   GDF5, NOG, pSMAD → ∅          (δ₁, δ₂, δ₃)
//!   ∅ → GDF5   hillr(pSMAD; μ₁, K₁, n₁)
//!   ∅ → NOG    hillr(pSMAD; μ₂, K₂, n₂)
//!   ∅ → pSMAD  μ₃·GDF5
//! ```
//!
//! pSMAD is intracellular and does not diffuse. There is no closed-form
//! steady state.

use super::traits::ReferenceSystem;
use crate::error::TuringResult;
use crate::model::ReactionModel;
use crate::params::{screen_values, ParameterSet, ScreenMode};

/// Parameter names in model order
pub const GDF5_NOG_PARAMETERS: [&str; 12] = [
    "k_plus", "k_minus", "delta_1", "delta_2", "delta_3", "mu_1", "mu_2", "mu_3", "K_1", "K_2", "n_1", "n_2",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gdf5Nog {
    pub k_plus: f64,
    pub k_minus: f64,
    pub delta_1: f64,
    pub delta_2: f64,
    pub delta_3: f64,
    pub mu_1: f64,
    pub mu_2: f64,
    pub mu_3: f64,
    pub k_1: f64,
    pub k_2: f64,
    pub n_1: f64,
    pub n_2: f64,
    /// Diffusion of GDF5, NOG, COMPLEX (pSMAD is fixed at 0)
    pub d_gdf5: f64,
    pub d_nog: f64,
    pub d_complex: f64,
}

impl Default for Gdf5Nog {
    fn default() -> Self {
        Self {
            k_plus: 50.0,
            k_minus: 50.0,
            delta_1: 1.0,
            delta_2: 1.0,
            delta_3: 1.0,
            mu_1: 1.0,
            mu_2: 1.0,
            mu_3: 1.0,
            k_1: 0.5,
            k_2: 0.5,
            n_1: 8.0,
            n_2: 2.0,
            d_gdf5: 1.0,
            d_nog: 1.0,
            d_complex: 10.0,
        }
    }
}

impl Gdf5Nog {
    /// Screening space of the digit-joint study
    ///
    /// δ₃, μ₁, μ₃, n₁, n₂ are fixed; the remaining reaction parameters take
    /// `number` linearly spaced values, and the GDF5 and COMPLEX diffusion
    /// constants range over [0.1, 30].
    pub fn screening_parameters(number: usize) -> TuringResult<ParameterSet> {
        let lin = |min, max| screen_values(min, max, number, ScreenMode::Linear);
        Ok(ParameterSet::new()
            .with_reaction("delta_3", [1.0])
            .with_reaction("mu_1", [1.0])
            .with_reaction("mu_3", [1.0])
            .with_reaction("n_1", [8.0])
            .with_reaction("n_2", [2.0])
            .with_reaction("delta_1", lin(0.1, 10.0)?)
            .with_reaction("delta_2", lin(0.1, 10.0)?)
            .with_reaction("mu_2", lin(0.1, 10.0)?)
            .with_reaction("k_plus", lin(10.0, 100.0)?)
            .with_reaction("k_minus", lin(10.0, 100.0)?)
            .with_reaction("K_1", lin(0.01, 1.0)?)
            .with_reaction("K_2", lin(0.01, 1.0)?)
            .with_diffusion("NOG", [1.0])
            .with_diffusion("GDF5", lin(0.1, 30.0)?)
            .with_diffusion("COMPLEX", lin(0.1, 30.0)?))
    }
}

impl ReferenceSystem for Gdf5Nog {
    fn name(&self) -> &'static str {
        "gdf5_nog"
    }

    fn model(&self) -> TuringResult<ReactionModel> {
        ReactionModel::builder()
            .species(["GDF5", "NOG", "COMPLEX", "pSMAD"])
            .parameters(GDF5_NOG_PARAMETERS)
            // complex formation
            .mass_action("k_plus", &[("GDF5", 1), ("NOG", 1)], &[("COMPLEX", 1)])
            .mass_action("k_minus", &[("COMPLEX", 1)], &[("GDF5", 1), ("NOG", 1)])
            // degradation
            .degradation("GDF5", "delta_1")
            .degradation("NOG", "delta_2")
            .degradation("pSMAD", "delta_3")
            // transcriptional feedback
            .hill_production("GDF5", "pSMAD", "mu_1", "K_1", "n_1", true)
            .hill_production("NOG", "pSMAD", "mu_2", "K_2", "n_2", true)
            // signalling
            .mass_action("mu_3", &[("GDF5", 1)], &[("GDF5", 1), ("pSMAD", 1)])
            .build()
    }

    fn reaction_params(&self) -> Vec<f64> {
        vec![
            self.k_plus,
            self.k_minus,
            self.delta_1,
            self.delta_2,
            self.delta_3,
            self.mu_1,
            self.mu_2,
            self.mu_3,
            self.k_1,
            self.k_2,
            self.n_1,
            self.n_2,
        ]
    }

    fn diffusion(&self) -> Vec<f64> {
        vec![self.d_gdf5, self.d_nog, self.d_complex, 0.0]
    }
}
