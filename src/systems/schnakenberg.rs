//! Schnakenberg: Activator–Depleted Substrate
//!
//!   du/dt = a − u + u²v + D_u ∇²u
//!   dv/dt = b − u²v     + D_v ∇²v
//!
//! Reactions: ∅ → u (a), u → ∅ (1), 2u + v → 3u (1), ∅ → v (b).
//!
//! ## Fixed Point
//!
//!   u* = a + b,   v* = b / (a + b)²
//!
//! u is the self-enhancing activator; v is consumed by the autocatalytic
//! step, so the pattern is anti-phase (u peaks where v is depleted).
//!
//! ## References
//!
//! - Schnakenberg, J. (1979). Simple chemical reaction systems with limit
//!   cycle behaviour. J. Theor. Biol.

use super::traits::ReferenceSystem;
use crate::error::TuringResult;
use crate::model::ReactionModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schnakenberg {
    pub a: f64,
    pub b: f64,
    pub du: f64,
    pub dv: f64,
}

impl Default for Schnakenberg {
    fn default() -> Self {
        Self::new(0.1, 0.9, 1.0, 40.0)
    }
}

impl Schnakenberg {
    pub fn new(a: f64, b: f64, du: f64, dv: f64) -> Self {
        Self { a, b, du, dv }
    }

    /// Analytic Jacobian at the fixed point, row-major [f_u, f_v, g_u, g_v]
    pub fn jacobian_at_steady_state(&self) -> [f64; 4] {
        let u = self.a + self.b;
        let v = self.b / (u * u);
        [-1.0 + 2.0 * u * v, u * u, -2.0 * u * v, -u * u]
    }
}

impl ReferenceSystem for Schnakenberg {
    fn name(&self) -> &'static str {
        "schnakenberg"
    }

    fn model(&self) -> TuringResult<ReactionModel> {
        ReactionModel::builder()
            .species(["u", "v"])
            .parameters(["a", "b"])
            .reaction(&[("u", 1)], |_, p| p[0])
            .reaction(&[("u", -1)], |c, _| c[0])
            .reaction(&[("u", 1), ("v", -1)], |c, _| c[0] * c[0] * c[1])
            .reaction(&[("v", 1)], |_, p| p[1])
            .build()
    }

    fn reaction_params(&self) -> Vec<f64> {
        vec![self.a, self.b]
    }

    fn diffusion(&self) -> Vec<f64> {
        vec![self.du, self.dv]
    }

    fn steady_state(&self) -> Option<Vec<f64>> {
        let u = self.a + self.b;
        (u > 0.0).then(|| vec![u, self.b / (u * u)])
    }
}
