//! Steady-State Solver: Homogeneous Equilibria of the Reaction Kinetics
//!
//! Integrates the well-mixed system
//!
//!   dC/dt = S · r(C, p)
//!
//! forward from an initial condition until the rates settle:
//!
//!   |fᵢ(C)| ≤ abs_tol + rel_tol·|Cᵢ|   for every species i
//!
//! Integration stops with a [`ConvergenceFailure`] when the step budget or
//! the time span runs out, when a concentration goes negative beyond
//! tolerance, or when the state stops being finite.
//!
//! Different initial conditions may land on different equilibria
//! (multistability); for fixed inputs the result is deterministic.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::ConvergenceFailure;
use crate::integrate::{AdaptiveIntegrator, Attempt, Kinetics, OdeSystem};
use crate::model::ReactionModel;
use crate::params::{OdeAlgorithm, SweepOptions};

/// Absolute step-error tolerance floor for the pseudo-transient
const STEP_ABS_TOL: f64 = 1e-6;
/// Relative step-error tolerance floor for the pseudo-transient
const STEP_REL_TOL: f64 = 1e-3;
/// Initial step size
const INITIAL_STEP: f64 = 1e-3;

/// Homogeneous equilibrium for one parameter combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    /// Concentrations in model species order
    pub values: Vec<f64>,
    /// Simulated time needed to settle
    pub time: f64,
    /// Integration attempts spent
    pub iterations: usize,
}

impl SteadyState {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Forward-integration steady-state finder
#[derive(Debug, Clone, Copy)]
pub struct SteadyStateSolver {
    algorithm: OdeAlgorithm,
    abs_tol: f64,
    rel_tol: f64,
    max_iterations: usize,
    time_span: f64,
}

impl Default for SteadyStateSolver {
    fn default() -> Self {
        Self::new(&SweepOptions::default())
    }
}

impl SteadyStateSolver {
    pub fn new(options: &SweepOptions) -> Self {
        Self {
            algorithm: options.solver_algorithm,
            abs_tol: options.abs_tol,
            rel_tol: options.rel_tol,
            max_iterations: options.max_iterations,
            time_span: options.time_span,
        }
    }

    /// Step-error control is looser than the convergence test: the
    /// transient only has to reach the attractor, not resolve the path.
    fn integrator(&self) -> AdaptiveIntegrator {
        AdaptiveIntegrator::new(
            self.algorithm,
            self.abs_tol.max(STEP_ABS_TOL),
            self.rel_tol.max(STEP_REL_TOL),
        )
    }

    /// Negative excursions smaller than this are clamped to zero
    fn negative_tolerance(&self) -> f64 {
        10.0 * self.abs_tol.max(STEP_ABS_TOL)
    }

    /// Rates small enough to call `y` an equilibrium
    pub fn is_converged(&self, y: &DVector<f64>, rates: &DVector<f64>) -> bool {
        y.iter()
            .zip(rates.iter())
            .all(|(c, f)| f.abs() <= self.abs_tol + self.rel_tol * c.abs())
    }

    /// Find the steady state reached from `initial_condition`
    pub fn solve(
        &self,
        model: &ReactionModel,
        reaction_params: &[f64],
        initial_condition: &[f64],
    ) -> Result<SteadyState, ConvergenceFailure> {
        let system = Kinetics::new(model, reaction_params);
        let integrator = self.integrator();
        let negative_tol = self.negative_tolerance();

        let mut y = DVector::from_column_slice(initial_condition);
        check_state(&mut y, negative_tol, 0.0)?;

        let mut t = 0.0;
        let mut h = INITIAL_STEP.min(self.time_span);
        let mut iterations = 0;

        loop {
            let rates = system.derivative(&y);
            if rates.iter().any(|f| !f.is_finite()) {
                return Err(ConvergenceFailure::NonFinite { time: t });
            }
            if self.is_converged(&y, &rates) {
                return Ok(SteadyState {
                    values: y.iter().copied().collect(),
                    time: t,
                    iterations,
                });
            }
            if iterations >= self.max_iterations {
                return Err(ConvergenceFailure::IterationBudgetExceeded { iterations, time: t });
            }
            if t >= self.time_span {
                return Err(ConvergenceFailure::TimeSpanExceeded {
                    time_span: self.time_span,
                });
            }

            let remaining = self.time_span - t;
            let last = h >= remaining;
            let step = if last { remaining } else { h };
            if step <= f64::EPSILON * t.max(1.0) {
                return Err(ConvergenceFailure::StepSizeUnderflow { step, time: t });
            }
            iterations += 1;

            match integrator.attempt(&system, &y, step) {
                Attempt::Accepted {
                    state, next_step, ..
                } => {
                    y = state;
                    t = if last { self.time_span } else { t + step };
                    h = next_step;
                    check_state(&mut y, negative_tol, t)?;
                }
                Attempt::Rejected { next_step } => h = next_step,
            }
        }
    }
}

/// Reject non-finite or clearly negative states; clamp round-off negatives
fn check_state(y: &mut DVector<f64>, negative_tol: f64, time: f64) -> Result<(), ConvergenceFailure> {
    for (species, value) in y.iter_mut().enumerate() {
        if !value.is_finite() {
            return Err(ConvergenceFailure::NonFinite { time });
        }
        if *value < -negative_tol {
            return Err(ConvergenceFailure::NegativeConcentration {
                species,
                value: *value,
                time,
            });
        }
        if *value < 0.0 {
            *value = 0.0;
        }
    }
    Ok(())
}
