//! Lengyel–Epstein: the CIMA Reaction
//!
//! Reduced two-variable model of the chlorite–iodide–malonic acid reaction,
//! the first chemical system with experimentally observed Turing patterns:
//!
//!   du/dt = a − u − 4uv/(1 + u²)        + D_u ∇²u
//!   dv/dt = σb·(u − uv/(1 + u²))         + D_v ∇²v
//!
//! u is iodide (activator), v chlorite (inhibitor); σ > 1 models the
//! starch complexation that slows the activator.
//!
//! ## Fixed Point
//!
//!   u* = a/5,   v* = 1 + u*²
//!
//! Homogeneous oscillations set in below b_H = 3a/5 − 25/a (σ = 1).
//!
//! ## References
//!
//! - Lengyel, I. & Epstein, I. R. (1991). Modeling of Turing structures in
//!   the chlorite–iodide–malonic acid–starch reaction system. Science.

use super::traits::{Bifurcating, ReferenceSystem};
use crate::error::TuringResult;
use crate::model::ReactionModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengyelEpstein {
    pub a: f64,
    pub b: f64,
    pub sigma: f64,
    pub du: f64,
    pub dv: f64,
}

impl Default for LengyelEpstein {
    fn default() -> Self {
        Self::new(10.0, 4.0, 1.0, 1.0, 30.0)
    }
}

impl LengyelEpstein {
    pub fn new(a: f64, b: f64, sigma: f64, du: f64, dv: f64) -> Self {
        Self { a, b, sigma, du, dv }
    }

    /// Hopf threshold in b for σ = 1
    pub fn hopf_b_critical(&self) -> f64 {
        3.0 * self.a / 5.0 - 25.0 / self.a
    }
}

/// u·v / (1 + u²)
fn inhibition(c: &[f64]) -> f64 {
    c[0] * c[1] / (1.0 + c[0] * c[0])
}

impl ReferenceSystem for LengyelEpstein {
    fn name(&self) -> &'static str {
        "lengyel_epstein"
    }

    fn model(&self) -> TuringResult<ReactionModel> {
        ReactionModel::builder()
            .species(["u", "v"])
            .parameters(["a", "b", "sigma"])
            .reaction(&[("u", 1)], |_, p| p[0])
            .reaction(&[("u", -1)], |c, _| c[0])
            .reaction(&[("u", -4)], |c, _| inhibition(c))
            .reaction(&[("v", 1)], |c, p| p[2] * p[1] * c[0])
            .reaction(&[("v", -1)], |c, p| p[2] * p[1] * inhibition(c))
            .build()
    }

    fn reaction_params(&self) -> Vec<f64> {
        vec![self.a, self.b, self.sigma]
    }

    fn diffusion(&self) -> Vec<f64> {
        vec![self.du, self.dv]
    }

    fn steady_state(&self) -> Option<Vec<f64>> {
        let u = self.a / 5.0;
        (u >= 0.0).then(|| vec![u, 1.0 + u * u])
    }
}

impl Bifurcating for LengyelEpstein {
    fn critical_parameter(&self) -> Option<f64> {
        (self.sigma == 1.0).then(|| self.hopf_b_critical())
    }

    fn bifurcation_type(&self) -> &'static str {
        "Hopf (supercritical)"
    }
}
