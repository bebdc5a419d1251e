//! PDE Simulation: Nonlinear Reaction-Diffusion Dynamics in 1D
//!
//! Integrates
//!
//!   ∂Cᵢ/∂t = [S · r(C, p)]ᵢ + Dᵢ ∂²Cᵢ/∂x²
//!
//! on [0, L] with no-flux boundaries, starting from a homogeneous state
//! plus seeded Gaussian noise. The linear analysis predicts onset; this
//! module shows what the pattern saturates to.
//!
//! ## Usage
//!
//! ```ignore
//! let params = get_params(&model, &records[0])?;
//! let config = SimulationConfig::from_parameter_set(&model, &params, SimulationOptions::default())?;
//! let trajectory = PdeSimulator::new().simulate(&model, &config)?;
//! let pattern = trajectory.endpoint();
//! ```

mod grid;
mod simulator;
mod trajectory;

pub use grid::Grid;
pub use simulator::{PdeSimulator, SimulationConfig};
pub use trajectory::{SimulationStatus, Trajectory};
