//! Adaptive one-step integrators with step-doubling error control
//!
//! Two families share the same controller:
//!
//! - **Rosenbrock-Euler** (linearly implicit, order 1):
//!
//!   (I − hJ(yₙ)) k = h f(yₙ),   yₙ₊₁ = yₙ + k
//!
//!   L-stable, so stiff kinetics do not force tiny steps.
//!
//! - **RK4** (explicit, order 4):
//!
//!   k₁ = f(yₙ), k₂ = f(yₙ + h/2·k₁), k₃ = f(yₙ + h/2·k₂), k₄ = f(yₙ + h·k₃)
//!   yₙ₊₁ = yₙ + h/6·(k₁ + 2k₂ + 2k₃ + k₄)
//!
//! Each attempt takes one step of size h and two of size h/2; the
//! difference, scaled by 1/(2ᵖ − 1), estimates the local error. The
//! two-half-step result is kept on acceptance.

use nalgebra::{DMatrix, DVector};

use super::traits::OdeSystem;
use crate::error::ConvergenceFailure;
use crate::params::OdeAlgorithm;

const SAFETY: f64 = 0.9;
const MAX_GROWTH: f64 = 5.0;
const MIN_SHRINK: f64 = 0.2;

/// Outcome of one error-controlled attempt
#[derive(Debug, Clone)]
pub enum Attempt {
    /// Step accepted; `next_step` is the suggested size for the next attempt
    Accepted {
        state: DVector<f64>,
        error: f64,
        next_step: f64,
    },
    /// Step rejected; retry with `next_step`
    Rejected { next_step: f64 },
}

/// Work counters from [`AdaptiveIntegrator::integrate`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rejected: usize,
    /// Last suggested step size
    pub next_step: f64,
}

/// Error-controlled integrator
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveIntegrator {
    algorithm: OdeAlgorithm,
    abs_tol: f64,
    rel_tol: f64,
}

impl AdaptiveIntegrator {
    pub fn new(algorithm: OdeAlgorithm, abs_tol: f64, rel_tol: f64) -> Self {
        Self {
            algorithm,
            abs_tol,
            rel_tol,
        }
    }

    pub fn algorithm(&self) -> OdeAlgorithm {
        self.algorithm
    }

    /// Order of the underlying method
    pub fn order(&self) -> i32 {
        match self.algorithm {
            OdeAlgorithm::Rosenbrock => 1,
            OdeAlgorithm::Rk4 => 4,
        }
    }

    /// Single unchecked step of size `h`
    pub fn step<S: OdeSystem + ?Sized>(&self, system: &S, y: &DVector<f64>, h: f64) -> Option<DVector<f64>> {
        let next = match self.algorithm {
            OdeAlgorithm::Rosenbrock => rosenbrock_euler_step(system, y, h)?,
            OdeAlgorithm::Rk4 => rk4_step(system, y, h),
        };
        next.iter().all(|v| v.is_finite()).then_some(next)
    }

    /// Weighted RMS norm of `diff` relative to the tolerances
    fn error_norm(&self, diff: &DVector<f64>, y_old: &DVector<f64>, y_new: &DVector<f64>) -> f64 {
        let n = diff.len().max(1) as f64;
        let sum: f64 = diff
            .iter()
            .zip(y_old.iter().zip(y_new.iter()))
            .map(|(d, (a, b))| {
                let scale = self.abs_tol + self.rel_tol * a.abs().max(b.abs());
                (d / scale).powi(2)
            })
            .sum();
        (sum / n).sqrt()
    }

    /// One step-doubling attempt of size `h`
    pub fn attempt<S: OdeSystem + ?Sized>(&self, system: &S, y: &DVector<f64>, h: f64) -> Attempt {
        let full = self.step(system, y, h);
        let halves = self
            .step(system, y, 0.5 * h)
            .and_then(|mid| self.step(system, &mid, 0.5 * h));

        let (full, halves) = match (full, halves) {
            (Some(f), Some(s)) => (f, s),
            _ => {
                return Attempt::Rejected {
                    next_step: h * MIN_SHRINK,
                }
            }
        };

        let p = self.order();
        let diff = (&halves - &full) / (2f64.powi(p) - 1.0);
        let error = self.error_norm(&diff, y, &halves);
        let factor = if error == 0.0 {
            MAX_GROWTH
        } else {
            (SAFETY * error.powf(-1.0 / (p as f64 + 1.0))).clamp(MIN_SHRINK, MAX_GROWTH)
        };

        if error <= 1.0 {
            Attempt::Accepted {
                state: halves,
                error,
                next_step: h * factor,
            }
        } else {
            Attempt::Rejected {
                next_step: h * factor.min(SAFETY),
            }
        }
    }

    /// Integrate from `t0` to `t1`, starting with step `h0`
    ///
    /// Fails once `max_attempts` attempts are spent or the step size
    /// collapses.
    pub fn integrate<S: OdeSystem + ?Sized>(
        &self,
        system: &S,
        y0: DVector<f64>,
        t0: f64,
        t1: f64,
        h0: f64,
        max_attempts: usize,
    ) -> Result<(DVector<f64>, IntegrationStats), ConvergenceFailure> {
        let mut y = y0;
        let mut t = t0;
        let mut h = h0.min(t1 - t0);
        let mut stats = IntegrationStats::default();

        while t < t1 {
            if stats.accepted + stats.rejected >= max_attempts {
                return Err(ConvergenceFailure::IterationBudgetExceeded {
                    iterations: stats.accepted + stats.rejected,
                    time: t,
                });
            }
            let remaining = t1 - t;
            let last = h >= remaining;
            let step = if last { remaining } else { h };
            if step <= f64::EPSILON * t.abs().max(1.0) {
                return Err(ConvergenceFailure::StepSizeUnderflow { step, time: t });
            }

            match self.attempt(system, &y, step) {
                Attempt::Accepted {
                    state, next_step, ..
                } => {
                    y = state;
                    t = if last { t1 } else { t + step };
                    h = next_step;
                    stats.accepted += 1;
                }
                Attempt::Rejected { next_step } => {
                    h = next_step;
                    stats.rejected += 1;
                }
            }
        }

        stats.next_step = h;
        Ok((y, stats))
    }
}

fn rosenbrock_euler_step<S: OdeSystem + ?Sized>(system: &S, y: &DVector<f64>, h: f64) -> Option<DVector<f64>> {
    let n = system.dimension();
    let f = system.derivative(y);
    let jac = system.jacobian(y.as_slice());
    let lhs = DMatrix::<f64>::identity(n, n) - jac * h;
    let k = lhs.lu().solve(&(f * h))?;
    Some(y + k)
}

fn rk4_step<S: OdeSystem + ?Sized>(system: &S, y: &DVector<f64>, h: f64) -> DVector<f64> {
    // k1
    let k1 = system.derivative(y);
    // k2
    let k2 = system.derivative(&(y + &k1 * (h / 2.0)));
    // k3
    let k3 = system.derivative(&(y + &k2 * (h / 2.0)));
    // k4
    let k4 = system.derivative(&(y + &k3 * h));

    y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dy/dt = -λ y
    struct Decay(f64);

    impl OdeSystem for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn rhs(&self, y: &[f64], dy: &mut [f64]) {
            dy[0] = -self.0 * y[0];
        }

        fn jacobian(&self, _y: &[f64]) -> DMatrix<f64> {
            DMatrix::from_element(1, 1, -self.0)
        }
    }

    #[test]
    fn test_rk4_accuracy() {
        let integrator = AdaptiveIntegrator::new(OdeAlgorithm::Rk4, 1e-10, 1e-8);
        let (y, _) = integrator
            .integrate(&Decay(1.0), DVector::from_element(1, 1.0), 0.0, 2.0, 0.1, 10_000)
            .unwrap();
        assert!((y[0] - (-2.0f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_rosenbrock_accuracy() {
        let integrator = AdaptiveIntegrator::new(OdeAlgorithm::Rosenbrock, 1e-8, 1e-6);
        let (y, _) = integrator
            .integrate(&Decay(1.0), DVector::from_element(1, 1.0), 0.0, 2.0, 0.1, 100_000)
            .unwrap();
        assert!((y[0] - (-2.0f64).exp()).abs() < 5e-3);
    }

    #[test]
    fn test_rosenbrock_handles_stiffness() {
        // λ = 1e6 would need ~1e6 explicit steps; the implicit scheme grows h
        let integrator = AdaptiveIntegrator::new(OdeAlgorithm::Rosenbrock, 1e-6, 1e-3);
        let (y, stats) = integrator
            .integrate(&Decay(1e6), DVector::from_element(1, 1.0), 0.0, 10.0, 1e-3, 5_000)
            .unwrap();
        assert!(y[0].abs() < 1e-5);
        assert!(stats.accepted < 5_000);
    }

    #[test]
    fn test_budget_exceeded() {
        let integrator = AdaptiveIntegrator::new(OdeAlgorithm::Rk4, 1e-12, 1e-12);
        let result = integrator.integrate(&Decay(1.0), DVector::from_element(1, 1.0), 0.0, 100.0, 1e-3, 3);
        assert!(matches!(
            result,
            Err(ConvergenceFailure::IterationBudgetExceeded { .. })
        ));
    }
}
