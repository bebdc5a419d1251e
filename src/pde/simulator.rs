//! Strang-split integration of the 1D reaction-diffusion system
//!
//!   ∂C/∂t = S · r(C, p) + D ∂²C/∂x²,   ∂C/∂x = 0 at x = 0, L
//!
//! One outer step of size h:
//!
//! ```text
//!   R(h/2)  local kinetics at every grid point (adaptive ODE integrator)
//!   D(h)    backward Euler per species (tridiagonal solve)
//!   R(h/2)
//! ```
//!
//! The outer step is controlled by step doubling: one step of h against
//! two of h/2. Concentrations are clamped at zero after each sub-step.

use log::{info, warn};
use nalgebra::DVector;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::grid::Grid;
use super::trajectory::{SimulationStatus, Trajectory};
use crate::error::{ConvergenceFailure, TuringError, TuringResult};
use crate::integrate::{AdaptiveIntegrator, Kinetics};
use crate::model::ReactionModel;
use crate::params::{ParamKind, ParameterSet, Sampling, SimulationOptions};
use crate::stability::StabilityAnalyzer;
use crate::sweep::DOMAIN_WAVELENGTHS;

const SAFETY: f64 = 0.9;
const MAX_GROWTH: f64 = 5.0;
const MIN_SHRINK: f64 = 0.2;
/// Local kinetics run this much tighter than the outer step control
const REACTION_TOL_FACTOR: f64 = 0.1;
/// Attempt budget of one local reaction sub-step
const REACTION_MAX_ATTEMPTS: usize = 10_000;

/// Everything needed for one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Model parameter order
    pub reaction_params: Vec<f64>,
    /// Species order
    pub diffusion_constants: Vec<f64>,
    /// Homogeneous starting concentrations, species order
    pub initial_condition: Vec<f64>,
    /// Standard deviation of the Gaussian perturbation
    pub initial_noise: f64,
    /// Derived from the dominant wavelength when unset
    pub domain_size: Option<f64>,
    /// Fresh seed drawn (and logged) when unset
    pub random_seed: Option<u64>,
    pub options: SimulationOptions,
}

impl SimulationConfig {
    /// Build from a single-valued [`ParameterSet`]
    pub fn from_parameter_set(
        model: &ReactionModel,
        params: &ParameterSet,
        options: SimulationOptions,
    ) -> TuringResult<Self> {
        params.validate(model)?;
        options.validate()?;
        Ok(Self {
            reaction_params: params.single_values(model, ParamKind::Reaction)?,
            diffusion_constants: params.single_values(model, ParamKind::Diffusion)?,
            initial_condition: params.single_values(model, ParamKind::InitialCondition)?,
            initial_noise: params.initial_noise,
            domain_size: params.domain_size,
            random_seed: params.random_seed,
            options,
        })
    }

    fn validate(&self, model: &ReactionModel) -> TuringResult<()> {
        self.options.validate()?;
        let n = model.n_species();
        if self.reaction_params.len() != model.n_parameters() {
            return Err(TuringError::config(format!(
                "expected {} reaction parameters, got {}",
                model.n_parameters(),
                self.reaction_params.len()
            )));
        }
        if self.diffusion_constants.len() != n || self.initial_condition.len() != n {
            return Err(TuringError::config(format!(
                "expected {} diffusion constants and initial conditions",
                n
            )));
        }
        let nonnegative = |v: &f64| v.is_finite() && *v >= 0.0;
        if !self.diffusion_constants.iter().all(nonnegative) || !self.initial_condition.iter().all(nonnegative) {
            return Err(TuringError::config(
                "diffusion constants and initial conditions must be finite and >= 0",
            ));
        }
        if !nonnegative(&self.initial_noise) {
            return Err(TuringError::config(format!(
                "initial_noise must be finite and >= 0, got {}",
                self.initial_noise
            )));
        }
        Ok(())
    }
}

/// 1D reaction-diffusion simulator
#[derive(Debug, Clone, Default)]
pub struct PdeSimulator {
    analyzer: StabilityAnalyzer,
}

impl PdeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `analyzer` when the domain size has to be derived
    pub fn with_analyzer(analyzer: StabilityAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Domain length: explicit, or three dominant wavelengths at the initial condition
    pub fn domain_size(&self, model: &ReactionModel, config: &SimulationConfig) -> TuringResult<f64> {
        if let Some(size) = config.domain_size {
            return Ok(size);
        }
        let report = self.analyzer.analyze(
            model,
            &config.initial_condition,
            &config.reaction_params,
            &config.diffusion_constants,
        )?;
        report.wavelength.map(|w| DOMAIN_WAVELENGTHS * w).ok_or_else(|| {
            TuringError::config(format!(
                "domain_size unset and the initial condition is not pattern-forming ({:?})",
                report.classification
            ))
        })
    }

    pub fn simulate(&self, model: &ReactionModel, config: &SimulationConfig) -> TuringResult<Trajectory> {
        config.validate(model)?;
        let options = &config.options;

        let domain_size = self.domain_size(model, config)?;
        let grid = Grid::new(domain_size, options.grid_points)?;

        let seed = config.random_seed.unwrap_or_else(|| rand::rng().random());
        info!(
            "Simulating {} species on {} points over [0, {:.4}] to t = {} (seed {})",
            model.n_species(),
            grid.len(),
            domain_size,
            options.final_time,
            seed
        );

        let mut state = initial_field(config, grid.len(), seed)?;
        let stepper = SplitStepper {
            kinetics: Kinetics::new(model, &config.reaction_params),
            diffusion: &config.diffusion_constants,
            grid: &grid,
            reaction: AdaptiveIntegrator::new(
                options.algorithm,
                options.abs_tol * REACTION_TOL_FACTOR,
                options.rel_tol * REACTION_TOL_FACTOR,
            ),
        };

        let sample_times: &[f64] = match &options.sampling {
            Sampling::EveryStep => &[],
            Sampling::Times(times) => times,
        };
        let every_step = matches!(options.sampling, Sampling::EveryStep);

        let mut times = Vec::new();
        let mut states = Vec::new();
        let mut next_sample = 0;

        let mut t = 0.0;
        if every_step {
            times.push(t);
            states.push(state.clone());
        }
        while next_sample < sample_times.len() && sample_times[next_sample] <= t {
            times.push(t);
            states.push(state.clone());
            next_sample += 1;
        }

        let final_time = options.final_time;
        let mut h = options.dt.min(final_time);
        let mut iterations = 0;
        let mut status = SimulationStatus::Completed;

        while t < final_time {
            if iterations >= options.max_iterations {
                warn!(
                    "Simulation stopped at t = {:.4e} of {}: {} step budget exhausted",
                    t, final_time, options.max_iterations
                );
                status = SimulationStatus::BudgetExceeded { reached_time: t };
                break;
            }

            let target = sample_times
                .get(next_sample)
                .copied()
                .unwrap_or(final_time)
                .min(final_time);
            let remaining = target - t;
            let landing = h >= remaining;
            let step = if landing { remaining } else { h };
            if step <= f64::EPSILON * t.max(1.0) {
                warn!("Simulation stalled at t = {:.4e}: step size {:.3e}", t, step);
                status = SimulationStatus::Stalled { reached_time: t };
                break;
            }
            iterations += 1;

            let full = stepper.step(&state, step);
            let halves = stepper
                .step(&state, 0.5 * step)
                .and_then(|mid| stepper.step(&mid, 0.5 * step));

            let (full, halves) = match (full, halves) {
                (Ok(f), Ok(s)) => (f, s),
                _ => {
                    h = step * MIN_SHRINK;
                    continue;
                }
            };

            // Strang splitting with backward-Euler diffusion is first order
            let error = error_norm(&full, &halves, &state, options.abs_tol, options.rel_tol);
            let factor = if error == 0.0 {
                MAX_GROWTH
            } else {
                (SAFETY * error.powf(-0.5)).clamp(MIN_SHRINK, MAX_GROWTH)
            };

            if error > 1.0 {
                h = step * factor.min(SAFETY);
                continue;
            }

            state = halves;
            t = if landing { target } else { t + step };
            h = if landing { h.max(step * factor) } else { step * factor };

            let sampled = next_sample < sample_times.len() && landing && target == sample_times[next_sample];
            if every_step || sampled {
                times.push(t);
                states.push(state.clone());
            }
            if sampled {
                next_sample += 1;
                // duplicate instants
                while next_sample < sample_times.len() && sample_times[next_sample] <= t {
                    times.push(t);
                    states.push(state.clone());
                    next_sample += 1;
                }
            }
        }

        info!(
            "Simulation finished at t = {:.4e} after {} steps ({} states stored)",
            t,
            iterations,
            times.len()
        );

        Ok(Trajectory {
            species: model.species().to_vec(),
            spatial_grid: grid.points().to_vec(),
            times,
            states,
            seed,
            domain_size,
            status,
        })
    }
}

/// Homogeneous initial condition plus clamped Gaussian noise
fn initial_field(config: &SimulationConfig, n_points: usize, seed: u64) -> TuringResult<Array2<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, config.initial_noise).map_err(|e| TuringError::config(e.to_string()))?;

    let n_species = config.initial_condition.len();
    let mut field = Array2::zeros((n_species, n_points));
    for ((i, _), value) in field.indexed_iter_mut() {
        *value = (config.initial_condition[i] + normal.sample(&mut rng)).max(0.0);
    }
    Ok(field)
}

/// Weighted RMS of (halves − full) over every species and grid point
fn error_norm(full: &Array2<f64>, halves: &Array2<f64>, old: &Array2<f64>, abs_tol: f64, rel_tol: f64) -> f64 {
    let n = full.len().max(1) as f64;
    let sum: f64 = full
        .iter()
        .zip(halves.iter())
        .zip(old.iter())
        .map(|((f, s), o)| {
            let scale = abs_tol + rel_tol * o.abs().max(s.abs());
            ((s - f) / scale).powi(2)
        })
        .sum();
    (sum / n).sqrt()
}

/// One Strang step on the whole field
struct SplitStepper<'a> {
    kinetics: Kinetics<'a>,
    diffusion: &'a [f64],
    grid: &'a Grid,
    reaction: AdaptiveIntegrator,
}

impl SplitStepper<'_> {
    fn step(&self, state: &Array2<f64>, h: f64) -> Result<Array2<f64>, ConvergenceFailure> {
        let mut next = state.clone();
        self.react(&mut next, 0.5 * h)?;
        self.diffuse(&mut next, h);
        self.react(&mut next, 0.5 * h)?;
        Ok(next)
    }

    /// Local kinetics at every grid point
    fn react(&self, field: &mut Array2<f64>, h: f64) -> Result<(), ConvergenceFailure> {
        for mut column in field.columns_mut() {
            let y0 = DVector::from_iterator(column.len(), column.iter().copied());
            let (y, _) = self
                .reaction
                .integrate(&self.kinetics, y0, 0.0, h, h, REACTION_MAX_ATTEMPTS)?;
            for (slot, value) in column.iter_mut().zip(y.iter()) {
                *slot = value.max(0.0);
            }
        }
        Ok(())
    }

    /// Implicit diffusion per species
    fn diffuse(&self, field: &mut Array2<f64>, h: f64) {
        let mut scratch = Vec::with_capacity(self.grid.len());
        let mut buffer = vec![0.0; self.grid.len()];
        for (mut row, &d) in field.rows_mut().into_iter().zip(self.diffusion) {
            if d == 0.0 {
                continue;
            }
            buffer.iter_mut().zip(row.iter()).for_each(|(b, v)| *b = *v);
            self.grid.implicit_diffusion(&mut buffer, d, h, &mut scratch);
            row.iter_mut().zip(&buffer).for_each(|(v, b)| *v = b.max(0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dC/dt = r·C·(1 − C/K)
    fn logistic() -> ReactionModel {
        ReactionModel::builder()
            .species(["C"])
            .parameters(["r", "K"])
            .reaction(&[("C", 1)], |c, p| p[0] * c[0])
            .reaction(&[("C", -1)], |c, p| p[0] * c[0] * c[0] / p[1])
            .build()
            .unwrap()
    }

    fn config(noise: f64) -> SimulationConfig {
        SimulationConfig {
            reaction_params: vec![1.0, 2.0],
            diffusion_constants: vec![0.5],
            initial_condition: vec![2.0],
            initial_noise: noise,
            domain_size: Some(10.0),
            random_seed: Some(42),
            options: SimulationOptions {
                final_time: 5.0,
                grid_points: 16,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_zero_noise_steady_state_is_preserved() {
        let traj = PdeSimulator::new().simulate(&logistic(), &config(0.0)).unwrap();
        assert!(traj.is_complete());
        assert_eq!(traj.times[0], 0.0);
        assert!((traj.times.last().unwrap() - 5.0).abs() < 1e-12);
        for state in &traj.states {
            assert!(state.iter().all(|c| (c - 2.0).abs() < 1e-9));
        }
    }

    #[test]
    fn test_noise_relaxes_back() {
        let traj = PdeSimulator::new().simulate(&logistic(), &config(0.1)).unwrap();
        let first = &traj.states[0];
        assert!(first.iter().any(|c| (c - 2.0).abs() > 1e-3));
        let end = traj.endpoint().unwrap();
        let spread = end.iter().map(|c| (c - 2.0).abs()).fold(0.0, f64::max);
        assert!(spread < 0.01, "spread {}", spread);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let a = PdeSimulator::new().simulate(&logistic(), &config(0.1)).unwrap();
        let b = PdeSimulator::new().simulate(&logistic(), &config(0.1)).unwrap();
        assert_eq!(a.seed, 42);
        assert_eq!(a.states[0], b.states[0]);
        assert_eq!(a.endpoint(), b.endpoint());
    }

    #[test]
    fn test_requested_sample_times() {
        let mut cfg = config(0.0);
        cfg.options.sampling = Sampling::Times(vec![0.0, 1.0, 2.5, 5.0]);
        let traj = PdeSimulator::new().simulate(&logistic(), &cfg).unwrap();
        assert_eq!(traj.times, vec![0.0, 1.0, 2.5, 5.0]);
        assert_eq!(traj.len(), 4);
    }

    #[test]
    fn test_budget_is_reported() {
        let mut cfg = config(0.0);
        cfg.options.max_iterations = 3;
        cfg.options.dt = 0.01;
        let traj = PdeSimulator::new().simulate(&logistic(), &cfg).unwrap();
        match traj.status {
            SimulationStatus::BudgetExceeded { reached_time } => assert!(reached_time < 5.0),
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(traj.len(), 4);
    }

    #[test]
    fn test_fresh_seed_is_recorded() {
        let mut cfg = config(0.05);
        cfg.random_seed = None;
        cfg.options.final_time = 0.1;
        let traj = PdeSimulator::new().simulate(&logistic(), &cfg).unwrap();
        let mut replay = cfg.clone();
        replay.random_seed = Some(traj.seed);
        let again = PdeSimulator::new().simulate(&logistic(), &replay).unwrap();
        assert_eq!(traj.states[0], again.states[0]);
    }

    #[test]
    fn test_multi_valued_parameter_set_rejected() {
        let model = logistic();
        let params = ParameterSet::new()
            .with_reaction("r", [1.0, 2.0])
            .with_reaction("K", [1.0]);
        assert!(SimulationConfig::from_parameter_set(&model, &params, SimulationOptions::default()).is_err());
    }

    #[test]
    fn test_collapsing_step_returns_partial_trajectory() {
        // Local kinetics fail at every step size, so the outer step shrinks to nothing
        let model = ReactionModel::builder()
            .species(["C"])
            .parameters(["r"])
            .reaction(&[("C", 1)], |c, p| if c[0] > 0.5 { f64::NAN } else { p[0] })
            .build()
            .unwrap();
        let mut cfg = config(0.0);
        cfg.reaction_params = vec![1.0];
        let traj = PdeSimulator::new().simulate(&model, &cfg).unwrap();
        assert_eq!(traj.status, SimulationStatus::Stalled { reached_time: 0.0 });
        assert!(!traj.is_complete());
        assert_eq!(traj.times, vec![0.0]);
        assert!(traj.states[0].iter().all(|c| *c == 2.0));
    }

    #[test]
    fn test_domain_requires_pattern_when_unset() {
        let mut cfg = config(0.0);
        cfg.domain_size = None;
        let err = PdeSimulator::new().simulate(&logistic(), &cfg).unwrap_err();
        assert!(matches!(err, TuringError::InvalidParameterConfiguration(_)));
    }
}
