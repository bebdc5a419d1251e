//! Parameter Sweep: Turing Screening over Cartesian Parameter Spaces
//!
//! Every combination of candidate values is taken to its homogeneous
//! steady state and tested for diffusion-driven instability. Only
//! pattern-forming combinations produce a [`TuringRecord`]; the rest are
//! counted in the [`SweepSummary`]:
//!
//!   records + non_pattern_forming + convergence_failures + degenerate = total

mod engine;
mod record;
mod space;

pub use engine::{CombinationOutcome, ParameterSweep};
pub use record::{get_param, get_params, SweepResult, SweepSummary, TuringRecord, DOMAIN_WAVELENGTHS};
pub use space::{Combination, SweepSpace};
