//! Integrate Module: Time Stepping for Well-Mixed Kinetics
//!
//! Shared by the steady-state search and by the local reaction
//! sub-steps of the PDE simulator.

mod adaptive;
mod traits;

pub use adaptive::{AdaptiveIntegrator, Attempt, IntegrationStats};
pub use traits::{Kinetics, OdeSystem};
