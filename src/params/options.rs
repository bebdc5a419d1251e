//! Solver options for screening and simulation.
//!
//! Defaults follow the reference screening pipeline: steady states within
//! 1000 steps over a time span of 1e4 at abstol 1e-8 / reltol 1e-6,
//! dispatched in batches of 10 000 combinations.

use serde::{Deserialize, Serialize};

use crate::error::{TuringError, TuringResult};

/// Integrator family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdeAlgorithm {
    /// Linearly implicit (Rosenbrock-Euler) with step doubling; stiff-aware
    #[default]
    Rosenbrock,
    /// Classical explicit RK4 with step doubling
    Rk4,
}

/// Wavenumber scan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityOptions {
    /// Geometric samples over [q_max·q_min_ratio, q_max]
    pub scan_points: usize,
    /// Linear samples between the neighbours of the coarse maximum
    pub refine_points: usize,
    /// Upper wavenumber bound; derived from |J| and min D when unset
    pub q_max: Option<f64>,
    /// Lower bound of the scan relative to q_max
    pub q_min_ratio: f64,
    /// Relative eigenvalue tolerance, scaled by (1 + ‖J‖∞)
    pub tolerance: f64,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            scan_points: 512,
            refine_points: 64,
            q_max: None,
            q_min_ratio: 1e-4,
            tolerance: 1e-9,
        }
    }
}

impl StabilityOptions {
    pub fn validate(&self) -> TuringResult<()> {
        if self.scan_points < 2 {
            return Err(TuringError::config(format!(
                "scan_points must be >= 2, got {}",
                self.scan_points
            )));
        }
        if !(self.q_min_ratio > 0.0 && self.q_min_ratio < 1.0) {
            return Err(TuringError::config(format!(
                "q_min_ratio must be in (0, 1), got {}",
                self.q_min_ratio
            )));
        }
        if let Some(q) = self.q_max {
            if !q.is_finite() || q <= 0.0 {
                return Err(TuringError::config(format!("q_max must be > 0, got {}", q)));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(TuringError::config(format!(
                "tolerance must be >= 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Options for [`ParameterSweep`](crate::sweep::ParameterSweep)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    /// Cap on steady-state integration steps
    pub max_iterations: usize,
    /// Integrator used to reach steady state
    pub solver_algorithm: OdeAlgorithm,
    /// Absolute tolerance (step error and convergence)
    pub abs_tol: f64,
    /// Relative tolerance (step error and convergence)
    pub rel_tol: f64,
    /// Combinations per parallel dispatch unit
    pub batch_size: usize,
    /// Maximum simulated time allowed to reach steady state
    pub time_span: f64,
    /// Worker threads; available parallelism when unset
    pub threads: Option<usize>,
    /// Wavenumber scan
    pub stability: StabilityOptions,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            solver_algorithm: OdeAlgorithm::Rosenbrock,
            abs_tol: 1e-8,
            rel_tol: 1e-6,
            batch_size: 10_000,
            time_span: 1e4,
            threads: None,
            stability: StabilityOptions::default(),
        }
    }
}

impl SweepOptions {
    /// Validate configuration parameters.
    pub fn validate(&self) -> TuringResult<()> {
        if self.max_iterations == 0 {
            return Err(TuringError::config("max_iterations must be > 0"));
        }
        check_tolerances(self.abs_tol, self.rel_tol)?;
        if self.batch_size == 0 {
            return Err(TuringError::config("batch_size must be > 0"));
        }
        if !self.time_span.is_finite() || self.time_span <= 0.0 {
            return Err(TuringError::config(format!(
                "time_span must be finite and > 0, got {}",
                self.time_span
            )));
        }
        if self.threads == Some(0) {
            return Err(TuringError::config("threads must be > 0 when set"));
        }
        self.stability.validate()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> TuringResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

/// Which instants end up in the trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Every accepted outer step (plus t = 0)
    EveryStep,
    /// Exactly these instants (sorted, within [0, final_time])
    Times(Vec<f64>),
}

/// Options for [`PdeSimulator`](crate::pde::PdeSimulator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// End of the simulated interval
    pub final_time: f64,
    /// Output instants
    pub sampling: Sampling,
    /// Spatial grid points on [0, domain_size]
    pub grid_points: usize,
    /// Initial outer time step
    pub dt: f64,
    /// Integrator for the local reaction sub-steps
    pub algorithm: OdeAlgorithm,
    pub abs_tol: f64,
    pub rel_tol: f64,
    /// Cap on accepted + rejected outer steps
    pub max_iterations: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            final_time: 1000.0,
            sampling: Sampling::EveryStep,
            grid_points: 128,
            dt: 0.1,
            algorithm: OdeAlgorithm::Rosenbrock,
            abs_tol: 1e-6,
            rel_tol: 1e-4,
            max_iterations: 100_000,
        }
    }
}

impl SimulationOptions {
    pub fn validate(&self) -> TuringResult<()> {
        if !self.final_time.is_finite() || self.final_time <= 0.0 {
            return Err(TuringError::config(format!(
                "final_time must be finite and > 0, got {}",
                self.final_time
            )));
        }
        if let Sampling::Times(times) = &self.sampling {
            if times.is_empty() {
                return Err(TuringError::config("sample times must not be empty"));
            }
            if times.windows(2).any(|w| w[1] < w[0]) {
                return Err(TuringError::config("sample times must be sorted ascending"));
            }
            if times.iter().any(|t| !t.is_finite() || *t < 0.0 || *t > self.final_time) {
                return Err(TuringError::config(format!(
                    "sample times must lie within [0, {}]",
                    self.final_time
                )));
            }
        }
        if self.grid_points < 3 {
            return Err(TuringError::config(format!(
                "grid_points must be >= 3, got {}",
                self.grid_points
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TuringError::config(format!("dt must be > 0, got {}", self.dt)));
        }
        check_tolerances(self.abs_tol, self.rel_tol)?;
        if self.max_iterations == 0 {
            return Err(TuringError::config("max_iterations must be > 0"));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> TuringResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

fn check_tolerances(abs_tol: f64, rel_tol: f64) -> TuringResult<()> {
    if !(abs_tol > 0.0 && abs_tol.is_finite()) {
        return Err(TuringError::config(format!("abs_tol must be > 0, got {}", abs_tol)));
    }
    if !(rel_tol >= 0.0 && rel_tol.is_finite()) {
        return Err(TuringError::config(format!("rel_tol must be >= 0, got {}", rel_tol)));
    }
    Ok(())
}
