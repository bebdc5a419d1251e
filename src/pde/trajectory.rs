//! Simulated spatiotemporal trajectories

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// How the integration ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// Reached the final time
    Completed,
    /// Step budget used up; the trajectory stops at `reached_time`
    BudgetExceeded { reached_time: f64 },
    /// Step size collapsed at `reached_time`
    Stalled { reached_time: f64 },
}

/// Concentration fields over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Species names (row order of every state)
    pub species: Vec<String>,
    /// Grid point positions (column order of every state)
    pub spatial_grid: Vec<f64>,
    /// Output instants, ascending
    pub times: Vec<f64>,
    /// One species × space field per output instant
    pub states: Vec<Array2<f64>>,
    /// Seed of the initial perturbation
    pub seed: u64,
    /// Length of the simulated domain
    pub domain_size: f64,
    pub status: SimulationStatus,
}

impl Trajectory {
    /// Number of stored time points
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.status == SimulationStatus::Completed
    }

    /// Last stored state
    pub fn endpoint(&self) -> Option<&Array2<f64>> {
        self.states.last()
    }

    /// Stored state closest to `fraction` of the simulated span
    ///
    /// `fraction` is clamped to [0, 1]; returns the time and the state.
    pub fn timepoint(&self, fraction: f64) -> Option<(f64, &Array2<f64>)> {
        let first = *self.times.first()?;
        let last = *self.times.last()?;
        let target = first + fraction.clamp(0.0, 1.0) * (last - first);
        let index = self
            .times
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
            .map(|(i, _)| i)?;
        Some((self.times[index], &self.states[index]))
    }

    /// Spatial profile of one species at a stored time index
    pub fn profile(&self, species: &str, time_index: usize) -> Option<ArrayView1<'_, f64>> {
        let row = self.species.iter().position(|s| s == species)?;
        self.states.get(time_index).map(|state| state.row(row))
    }

    /// Time series of one species at one grid point
    pub fn series(&self, species: &str, grid_index: usize) -> Option<Vec<f64>> {
        let row = self.species.iter().position(|s| s == species)?;
        if grid_index >= self.spatial_grid.len() {
            return None;
        }
        Some(self.states.iter().map(|state| state[[row, grid_index]]).collect())
    }
}
