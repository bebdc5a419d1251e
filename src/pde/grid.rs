//! Uniform 1D grid with reflective (no-flux) boundaries
//!
//! Second-order Laplacian with ghost points u₋₁ = u₁, u_n = u_{n−2}:
//!
//!   (Lu)ᵢ = (uᵢ₋₁ − 2uᵢ + uᵢ₊₁) / Δx²
//!
//! The implicit diffusion step solves (I − D·Δt·L) u⁺ = u with the
//! Thomas algorithm; the system is strictly diagonally dominant for any
//! D·Δt ≥ 0, so no pivoting is needed.

use crate::error::{TuringError, TuringResult};

/// Grid points on [0, length]
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<f64>,
    spacing: f64,
}

impl Grid {
    pub fn new(length: f64, n_points: usize) -> TuringResult<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(TuringError::config(format!("domain size must be > 0, got {}", length)));
        }
        if n_points < 3 {
            return Err(TuringError::config(format!("need at least 3 grid points, got {}", n_points)));
        }
        let spacing = length / (n_points - 1) as f64;
        let points = (0..n_points)
            .map(|i| if i == n_points - 1 { length } else { i as f64 * spacing })
            .collect();
        Ok(Self { points, spacing })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Discrete Laplacian of `u` into `out`
    pub fn laplacian(&self, u: &[f64], out: &mut [f64]) {
        let n = u.len();
        let inv_dx2 = 1.0 / (self.spacing * self.spacing);
        for i in 0..n {
            let left = if i == 0 { u[1] } else { u[i - 1] };
            let right = if i == n - 1 { u[n - 2] } else { u[i + 1] };
            out[i] = (left - 2.0 * u[i] + right) * inv_dx2;
        }
    }

    /// Backward-Euler diffusion step in place
    ///
    /// `scratch` holds the modified super-diagonal and is resized as needed.
    pub fn implicit_diffusion(&self, u: &mut [f64], diffusion: f64, dt: f64, scratch: &mut Vec<f64>) {
        let n = u.len();
        let r = diffusion * dt / (self.spacing * self.spacing);
        if r == 0.0 || n < 2 {
            return;
        }
        scratch.clear();
        scratch.resize(n, 0.0);

        let diag = 1.0 + 2.0 * r;
        let lower = |i: usize| if i == n - 1 { -2.0 * r } else { -r };
        let upper = |i: usize| if i == 0 { -2.0 * r } else { -r };

        // forward sweep
        scratch[0] = upper(0) / diag;
        u[0] /= diag;
        for i in 1..n {
            let m = diag - lower(i) * scratch[i - 1];
            if i < n - 1 {
                scratch[i] = upper(i) / m;
            }
            u[i] = (u[i] - lower(i) * u[i - 1]) / m;
        }

        // back substitution
        for i in (0..n - 1).rev() {
            u[i] -= scratch[i] * u[i + 1];
        }
    }
}
