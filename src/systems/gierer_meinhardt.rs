//! Gierer–Meinhardt: Activator–Inhibitor
//!
//!   du/dt = a − b·u + u²/v + D_u ∇²u
//!   dv/dt = u² − v         + D_v ∇²v
//!
//! Fixed point: u* = (a + 1)/b, v* = u*². The activator u enhances its own
//! production and that of its inhibitor v, so the pattern is in phase.
//!
//! ## References
//!
//! - Gierer, A. & Meinhardt, H. (1972). A theory of biological pattern
//!   formation. Kybernetik.

use super::traits::ReferenceSystem;
use crate::error::TuringResult;
use crate::model::ReactionModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiererMeinhardt {
    pub a: f64,
    pub b: f64,
    pub du: f64,
    pub dv: f64,
}

impl Default for GiererMeinhardt {
    fn default() -> Self {
        Self::new(0.5, 1.5, 1.0, 50.0)
    }
}

impl GiererMeinhardt {
    pub fn new(a: f64, b: f64, du: f64, dv: f64) -> Self {
        Self { a, b, du, dv }
    }
}

impl ReferenceSystem for GiererMeinhardt {
    fn name(&self) -> &'static str {
        "gierer_meinhardt"
    }

    fn model(&self) -> TuringResult<ReactionModel> {
        ReactionModel::builder()
            .species(["u", "v"])
            .parameters(["a", "b"])
            .reaction(&[("u", 1)], |_, p| p[0])
            .degradation("u", "b")
            // Inhibited autocatalysis; no production without inhibitor
            .reaction(&[("u", 1)], |c, _| if c[1] > 0.0 { c[0] * c[0] / c[1] } else { 0.0 })
            .reaction(&[("v", 1)], |c, _| c[0] * c[0])
            .reaction(&[("v", -1)], |c, _| c[1])
            .build()
    }

    fn reaction_params(&self) -> Vec<f64> {
        vec![self.a, self.b]
    }

    fn diffusion(&self) -> Vec<f64> {
        vec![self.du, self.dv]
    }

    fn steady_state(&self) -> Option<Vec<f64>> {
        let u = (self.a + 1.0) / self.b;
        (self.b > 0.0 && u > 0.0).then(|| vec![u, u * u])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stability::StabilityAnalyzer;

    #[test]
    fn test_in_phase_turing_pattern() {
        let system = GiererMeinhardt::default();
        let model = system.model().unwrap();
        let report = StabilityAnalyzer::default()
            .analyze(
                &model,
                &system.steady_state().unwrap(),
                &system.reaction_params(),
                &system.diffusion(),
            )
            .unwrap();
        assert!(report.is_turing_unstable());
        assert!(report.non_oscillatory);
        assert_eq!(report.pattern_phase, vec![1, 1]);
    }
}
