//! Error types for Turing screening and simulation.
//!
//! Per-combination failures inside a sweep are recoverable and only counted;
//! configuration errors are fatal for the call and reported before any
//! numerical work starts.

use thiserror::Error;

/// Why a steady-state integration gave up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvergenceFailure {
    /// Step budget exhausted before the rates settled
    #[error("iteration budget exceeded after {iterations} steps (t = {time:.4e})")]
    IterationBudgetExceeded { iterations: usize, time: f64 },

    /// Simulated time span exhausted before the rates settled
    #[error("time span {time_span:.4e} exhausted before reaching steady state")]
    TimeSpanExceeded { time_span: f64 },

    /// A concentration went negative beyond numerical tolerance
    #[error("species {species} went negative ({value:.4e}) at t = {time:.4e}")]
    NegativeConcentration { species: usize, value: f64, time: f64 },

    /// NaN or infinite state / rate
    #[error("non-finite state encountered at t = {time:.4e}")]
    NonFinite { time: f64 },

    /// Step size collapsed below floating-point resolution
    #[error("step size underflow ({step:.3e}) at t = {time:.4e}")]
    StepSizeUnderflow { step: f64, time: f64 },
}

/// Root error type for the crate.
#[derive(Error, Debug)]
pub enum TuringError {
    /// Parameter set or options rejected before computation
    #[error("invalid parameter configuration: {0}")]
    InvalidParameterConfiguration(String),

    /// Model construction error (unknown names, shape mismatch)
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Steady state could not be reached
    #[error("steady-state convergence failure: {0}")]
    SteadyStateConvergence(#[from] ConvergenceFailure),

    /// Eigen-decomposition of the stability matrix failed or was not finite
    #[error("degenerate stability matrix: {0}")]
    DegenerateStabilityMatrix(String),

    /// Worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// JSON (de)serialization of configuration
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TuringError {
    /// Creates a parameter-configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        TuringError::InvalidParameterConfiguration(message.into())
    }

    /// Creates a model error.
    pub fn model(message: impl Into<String>) -> Self {
        TuringError::InvalidModel(message.into())
    }

    /// Creates a degenerate-matrix error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        TuringError::DegenerateStabilityMatrix(message.into())
    }

    /// True for failures that only invalidate a single parameter combination.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TuringError::SteadyStateConvergence(_) | TuringError::DegenerateStabilityMatrix(_)
        )
    }
}

pub type TuringResult<T> = Result<T, TuringError>;
