//! Brusselator: Autocatalytic Chemical Patterns
//!
//! The Brusselator is a theoretical model for autocatalytic chemical reactions:
//!
//!   dX/dt = A + X²Y - (B+1)X + D_X ∇²X
//!   dY/dt = BX - X²Y        + D_Y ∇²Y
//!
//! where:
//! - X, Y: Chemical concentrations
//! - A: Input concentration (fixed)
//! - B: Control parameter (bifurcation parameter)
//!
//! ## Fixed Point
//!
//! The homogeneous state is (X*, Y*) = (A, B/A), with Jacobian
//!
//!   J = | B − 1   A² |
//!       | −B     −A² |
//!
//! ## Bifurcations
//!
//! - Hopf (q = 0):  B_H = 1 + A²
//! - Turing (q > 0): B_T = (1 + A·sqrt(D_X/D_Y))²
//!
//! with critical wavenumber q_c² = A / sqrt(D_X·D_Y). Stationary patterns
//! need B_T < B < B_H, which requires D_Y ≫ D_X.
//!
//! ## References
//!
//! - Prigogine, I. & Lefever, R. (1968). Symmetry breaking instabilities
//!   in dissipative systems II. J. Chem. Phys.
//! - Nicolis, G. & Prigogine, I. (1977). Self-Organization in
//!   Nonequilibrium Systems. Wiley.

use super::traits::{Bifurcating, ReferenceSystem};
use crate::error::TuringResult;
use crate::model::ReactionModel;

/// Brusselator with diffusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brusselator {
    /// Parameter A (fixed)
    pub a: f64,
    /// Parameter B (control parameter)
    pub b: f64,
    /// Diffusion of the activator X
    pub dx: f64,
    /// Diffusion of the inhibitor Y
    pub dy: f64,
}

impl Default for Brusselator {
    /// Inside the Turing window: B_T ≈ 6.71 < 9 < B_H = 21.25
    fn default() -> Self {
        Self::new(4.5, 9.0, 2.0, 16.0)
    }
}

impl Brusselator {
    pub fn new(a: f64, b: f64, dx: f64, dy: f64) -> Self {
        Self { a, b, dx, dy }
    }

    /// Same diffusion, different control parameter
    pub fn with_b(self, b: f64) -> Self {
        Self { b: b.max(0.0), ..self }
    }

    /// Theoretical critical B for Hopf bifurcation
    ///
    /// B_c = 1 + A²
    pub fn theoretical_b_critical(&self) -> f64 {
        1.0 + self.a * self.a
    }

    /// Onset of the Turing instability, B_T = (1 + A·sqrt(D_X/D_Y))²
    pub fn turing_b_critical(&self) -> f64 {
        let s = 1.0 + self.a * (self.dx / self.dy).sqrt();
        s * s
    }

    /// Critical wavenumber at onset, q_c = (A / sqrt(D_X·D_Y))^½
    pub fn critical_wavenumber(&self) -> f64 {
        (self.a / (self.dx * self.dy).sqrt()).sqrt()
    }
}

impl ReferenceSystem for Brusselator {
    fn name(&self) -> &'static str {
        "brusselator"
    }

    fn model(&self) -> TuringResult<ReactionModel> {
        ReactionModel::builder()
            .species(["X", "Y"])
            .parameters(["A", "B"])
            // A -> X
            .reaction(&[("X", 1)], |_, p| p[0])
            // 2X + Y -> 3X
            .reaction(&[("X", 1), ("Y", -1)], |c, _| c[0] * c[0] * c[1])
            // B + X -> Y
            .mass_action("B", &[("X", 1)], &[("Y", 1)])
            // X -> ∅
            .reaction(&[("X", -1)], |c, _| c[0])
            .build()
    }

    fn reaction_params(&self) -> Vec<f64> {
        vec![self.a, self.b]
    }

    fn diffusion(&self) -> Vec<f64> {
        vec![self.dx, self.dy]
    }

    fn steady_state(&self) -> Option<Vec<f64>> {
        (self.a > 0.0).then(|| vec![self.a, self.b / self.a])
    }
}

impl Bifurcating for Brusselator {
    fn critical_parameter(&self) -> Option<f64> {
        Some(self.turing_b_critical())
    }

    fn bifurcation_type(&self) -> &'static str {
        "Turing (stationary)"
    }
}
