//! ODE System Trait: Standardized Right-Hand Side for the Integrators
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       OdeSystem Trait                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + dimension()   - Length of the state vector               │
//! │  + rhs()         - dy/dt at y                               │
//! │  + jacobian()    - ∂f/∂y at y (finite differences default)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Kinetics`] binds a [`ReactionModel`] to one reaction-parameter
//! vector, giving the well-mixed system dC/dt = S · r(C, p).

use nalgebra::{DMatrix, DVector};

use crate::model::ReactionModel;

/// Autonomous ODE system dy/dt = f(y)
pub trait OdeSystem {
    /// Dimension of the state vector
    fn dimension(&self) -> usize;

    /// Evaluate f(y) into `dy`
    fn rhs(&self, y: &[f64], dy: &mut [f64]);

    /// Allocating f(y)
    fn derivative(&self, y: &DVector<f64>) -> DVector<f64> {
        let mut dy = DVector::zeros(self.dimension());
        self.rhs(y.as_slice(), dy.as_mut_slice());
        dy
    }

    /// Jacobian ∂f/∂y
    ///
    /// Default: forward differences on `rhs`. Systems with cheaper or
    /// more accurate derivatives should override.
    fn jacobian(&self, y: &[f64]) -> DMatrix<f64> {
        let n = self.dimension();
        let mut base = vec![0.0; n];
        self.rhs(y, &mut base);

        let mut jac = DMatrix::zeros(n, n);
        let mut probe = y.to_vec();
        let mut shifted = vec![0.0; n];
        for j in 0..n {
            let h = f64::EPSILON.sqrt() * y[j].abs().max(1.0);
            probe[j] = y[j] + h;
            self.rhs(&probe, &mut shifted);
            for i in 0..n {
                jac[(i, j)] = (shifted[i] - base[i]) / h;
            }
            probe[j] = y[j];
        }
        jac
    }
}

/// Well-mixed reaction kinetics at fixed reaction parameters
#[derive(Debug, Clone, Copy)]
pub struct Kinetics<'a> {
    pub model: &'a ReactionModel,
    pub params: &'a [f64],
}

impl<'a> Kinetics<'a> {
    pub fn new(model: &'a ReactionModel, params: &'a [f64]) -> Self {
        Self { model, params }
    }
}

impl OdeSystem for Kinetics<'_> {
    fn dimension(&self) -> usize {
        self.model.n_species()
    }

    fn rhs(&self, y: &[f64], dy: &mut [f64]) {
        self.model.rate_of_change(y, self.params, dy);
    }

    fn jacobian(&self, y: &[f64]) -> DMatrix<f64> {
        self.model.jacobian(y, self.params)
    }
}
