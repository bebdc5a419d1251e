//! Dispersion-relation scan around a homogeneous steady state
//!
//! Linearizing the reaction-diffusion system around C* with a spatial
//! perturbation ∝ exp(iqx) gives the q-dependent stability matrix
//!
//!   M(q) = J − q² D
//!
//! with J the reaction Jacobian at C* and D = diag(d₁, …, d_N). The
//! dispersion relation λ(q) is the eigenvalue of M(q) with the largest
//! real part. A Turing instability needs:
//!
//! 1. every eigenvalue of J = M(0) has Re λ ≤ tol (stable without diffusion)
//! 2. some q > 0 with Re λ(q) > tol (destabilized by diffusion)
//!
//! ## Scan
//!
//! ```text
//!   Re λ(q)
//!     │        ╭──╮
//!   0 ┼───────╱────╲─────────────
//!     │──────╯      ╲____
//!     │                  ╲______
//!     └──┬──────┬────────┬───────► q  (log axis)
//!      q_min    q*      q_max
//! ```
//!
//! A geometric grid covers [q_max·q_min_ratio, q_max]; the interval between
//! the neighbours of the best coarse sample is then rescanned linearly.
//! Among samples within tol of the maximum, the smallest q wins.

use std::f64::consts::PI;

use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix};

use super::phase::{canonical_phase, dominant_eigenvector};
use crate::error::{TuringError, TuringResult};
use crate::model::ReactionModel;
use crate::params::StabilityOptions;

/// Floor on ‖J‖∞ when deriving q_max
const MIN_JACOBIAN_NORM: f64 = 1e-12;
/// Scale factor in q_max = 5·sqrt(‖J‖∞ / d_min)
const Q_MAX_FACTOR: f64 = 5.0;
const MAX_SCHUR_ITERATIONS: usize = 10_000;

/// Outcome of the stability analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Stable without diffusion, unstable for some q > 0
    TuringUnstable,
    /// Stable at every sampled wavenumber
    Stable,
    /// Already unstable at q = 0
    UnstableWithoutDiffusion,
    /// No species diffuses, so there is no q-dependence
    NoDiffusion,
    /// Stable at q = 0, but growth still rises at q_max
    ///
    /// Happens when a non-diffusing species is unstable on its own: λ(q)
    /// approaches that subsystem's eigenvalue as q → ∞ and no finite
    /// wavelength dominates. With an explicit `q_max` it can also mean the
    /// bound sits below the peak.
    ShortWaveUnstable,
}

/// Detailed result of [`StabilityAnalyzer::analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityReport {
    pub classification: Classification,
    /// Largest real part of λ(q) over the scan (q = 0 when nothing diffuses)
    pub max_real_eigenvalue: f64,
    /// Imaginary part of the eigenvalue attaining the maximum
    pub imaginary_part: f64,
    /// Largest real part among the eigenvalues of J
    pub homogeneous_max_real: f64,
    /// Dominant wavenumber q* (pattern-forming only)
    pub critical_wavenumber: Option<f64>,
    /// 2π / q* (pattern-forming only)
    pub wavelength: Option<f64>,
    /// Upper bound of the scan
    pub q_max: f64,
    /// |Im λ*| within tolerance
    pub non_oscillatory: bool,
    /// ±1 per species (pattern-forming only, empty otherwise)
    pub pattern_phase: Vec<i8>,
    /// Effective eigenvalue tolerance, tolerance·(1 + ‖J‖∞)
    pub tolerance: f64,
}

impl StabilityReport {
    pub fn is_turing_unstable(&self) -> bool {
        self.classification == Classification::TuringUnstable
    }
}

/// One sample of the dispersion relation
#[derive(Debug, Clone, Copy)]
struct Sample {
    q: f64,
    eigenvalue: Option<Complex<f64>>,
}

impl Sample {
    fn growth(&self) -> f64 {
        self.eigenvalue.map_or(f64::NEG_INFINITY, |l| l.re)
    }
}

/// Linear stability analyzer for reaction-diffusion steady states
#[derive(Debug, Clone, Default)]
pub struct StabilityAnalyzer {
    options: StabilityOptions,
}

impl StabilityAnalyzer {
    pub fn new(options: StabilityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StabilityOptions {
        &self.options
    }

    /// Analyze `model` at a steady state
    pub fn analyze(
        &self,
        model: &ReactionModel,
        steady_state: &[f64],
        reaction_params: &[f64],
        diffusion_constants: &[f64],
    ) -> TuringResult<StabilityReport> {
        self.options.validate()?;
        let n = model.n_species();
        if steady_state.len() != n || diffusion_constants.len() != n {
            return Err(TuringError::config(format!(
                "expected {} concentrations and diffusion constants, got {} and {}",
                n,
                steady_state.len(),
                diffusion_constants.len()
            )));
        }
        if reaction_params.len() != model.n_parameters() {
            return Err(TuringError::config(format!(
                "expected {} reaction parameters, got {}",
                model.n_parameters(),
                reaction_params.len()
            )));
        }
        let jacobian = model.jacobian(steady_state, reaction_params);
        self.classify(&jacobian, diffusion_constants)
    }

    /// Analyze a precomputed Jacobian J with diffusion D = diag(`diffusion`)
    pub fn analyze_jacobian(&self, jacobian: &DMatrix<f64>, diffusion: &[f64]) -> TuringResult<StabilityReport> {
        self.options.validate()?;
        self.classify(jacobian, diffusion)
    }

    fn classify(&self, jacobian: &DMatrix<f64>, diffusion: &[f64]) -> TuringResult<StabilityReport> {
        let n = jacobian.nrows();
        if jacobian.ncols() != n || diffusion.len() != n {
            return Err(TuringError::config(format!(
                "Jacobian is {}x{} but {} diffusion constants were given",
                n,
                jacobian.ncols(),
                diffusion.len()
            )));
        }
        if let Some(d) = diffusion.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(TuringError::config(format!(
                "diffusion constants must be finite and >= 0, got {}",
                d
            )));
        }
        if jacobian.iter().any(|v| !v.is_finite()) {
            return Err(TuringError::degenerate("Jacobian has non-finite entries"));
        }

        let norm = infinity_norm(jacobian);
        let tol = self.options.tolerance * (1.0 + norm);

        let homogeneous = eigenvalues(jacobian)?;
        let homogeneous_stable = homogeneous.iter().all(|l| l.re <= tol);
        let homogeneous_max_real = homogeneous
            .iter()
            .map(|l| l.re)
            .fold(f64::NEG_INFINITY, f64::max);

        let d_min = diffusion
            .iter()
            .copied()
            .filter(|d| *d > 0.0)
            .fold(f64::INFINITY, f64::min);

        if !d_min.is_finite() {
            let leading = leading_eigenvalue(&homogeneous, tol);
            return Ok(StabilityReport {
                classification: if homogeneous_stable {
                    Classification::NoDiffusion
                } else {
                    Classification::UnstableWithoutDiffusion
                },
                max_real_eigenvalue: leading.map_or(0.0, |l| l.re),
                imaginary_part: leading.map_or(0.0, |l| l.im),
                homogeneous_max_real,
                critical_wavenumber: None,
                wavelength: None,
                q_max: 0.0,
                non_oscillatory: leading.map_or(true, |l| l.im.abs() <= tol),
                pattern_phase: Vec::new(),
                tolerance: tol,
            });
        }

        let q_max = self
            .options
            .q_max
            .unwrap_or_else(|| Q_MAX_FACTOR * (norm.max(MIN_JACOBIAN_NORM) / d_min).sqrt());

        let (best, bracketed) = self.scan(jacobian, diffusion, q_max, tol)?;
        let max_real = best.eigenvalue.map_or(0.0, |l| l.re);
        let imaginary = best.eigenvalue.map_or(0.0, |l| l.im);

        let classification = if !homogeneous_stable {
            Classification::UnstableWithoutDiffusion
        } else if max_real <= tol {
            Classification::Stable
        } else if bracketed {
            Classification::TuringUnstable
        } else {
            Classification::ShortWaveUnstable
        };

        let (critical_wavenumber, wavelength, pattern_phase) = match (classification, best.eigenvalue) {
            (Classification::TuringUnstable, Some(lambda)) => {
                let m = stability_matrix(jacobian, diffusion, best.q);
                let vector = dominant_eigenvector(&m, lambda)?;
                (
                    Some(best.q),
                    Some(2.0 * PI / best.q),
                    canonical_phase(vector.as_slice()),
                )
            }
            _ => (None, None, Vec::new()),
        };

        Ok(StabilityReport {
            classification,
            max_real_eigenvalue: max_real,
            imaginary_part: imaginary,
            homogeneous_max_real,
            critical_wavenumber,
            wavelength,
            q_max,
            non_oscillatory: imaginary.abs() <= tol,
            pattern_phase,
            tolerance: tol,
        })
    }

    /// Coarse geometric scan followed by linear refinement around the peak
    ///
    /// Also returns whether the coarse maximum lies below q_max. When every
    /// species diffuses, Gershgorin's theorem puts all eigenvalues of M(q) in
    /// the left half-plane once q²·d_min > 2‖J‖∞, so the derived q_max always
    /// brackets a positive peak.
    fn scan(&self, jacobian: &DMatrix<f64>, diffusion: &[f64], q_max: f64, tol: f64) -> TuringResult<(Sample, bool)> {
        let sample = |q: f64| -> TuringResult<Sample> {
            let eigs = eigenvalues(&stability_matrix(jacobian, diffusion, q))?;
            Ok(Sample {
                q,
                eigenvalue: leading_eigenvalue(&eigs, tol),
            })
        };

        let n_coarse = self.options.scan_points;
        let q_min = q_max * self.options.q_min_ratio;
        let ratio = q_max / q_min;
        let coarse_qs: Vec<f64> = (0..n_coarse)
            .map(|i| {
                if i == n_coarse - 1 {
                    q_max
                } else {
                    q_min * ratio.powf(i as f64 / (n_coarse - 1) as f64)
                }
            })
            .collect();
        let mut samples = coarse_qs
            .iter()
            .map(|&q| sample(q))
            .collect::<TuringResult<Vec<_>>>()?;

        let peak = select_peak(&samples, tol);
        let bracketed = peak < n_coarse - 1;
        let lo = coarse_qs[peak.saturating_sub(1)];
        let hi = coarse_qs[(peak + 1).min(n_coarse - 1)];
        let n_fine = self.options.refine_points;
        if n_fine >= 2 && hi > lo {
            let step = (hi - lo) / (n_fine - 1) as f64;
            for i in 0..n_fine {
                samples.push(sample(lo + step * i as f64)?);
            }
        }

        let best = select_peak(&samples, tol);
        Ok((samples[best], bracketed))
    }
}

/// Index of the smallest q whose growth is within `tol` of the maximum
fn select_peak(samples: &[Sample], tol: f64) -> usize {
    let max = samples
        .iter()
        .map(Sample::growth)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut best = 0;
    let mut found = false;
    for (i, s) in samples.iter().enumerate() {
        let contender = s.growth() >= max - tol || s.growth() == max;
        if contender && (!found || s.q < samples[best].q) {
            best = i;
            found = true;
        }
    }
    best
}

/// M(q) = J − q² D
pub(crate) fn stability_matrix(jacobian: &DMatrix<f64>, diffusion: &[f64], q: f64) -> DMatrix<f64> {
    let mut m = jacobian.clone();
    let q2 = q * q;
    for (i, d) in diffusion.iter().enumerate() {
        m[(i, i)] -= q2 * d;
    }
    m
}

/// All eigenvalues via a real Schur decomposition
pub(crate) fn eigenvalues(m: &DMatrix<f64>) -> TuringResult<Vec<Complex<f64>>> {
    let schur = Schur::try_new(m.clone(), f64::EPSILON, MAX_SCHUR_ITERATIONS)
        .ok_or_else(|| TuringError::degenerate(format!("Schur decomposition of {}x{} matrix did not converge", m.nrows(), m.ncols())))?;
    let eigs: Vec<Complex<f64>> = schur.complex_eigenvalues().iter().copied().collect();
    if eigs.iter().any(|l| !l.re.is_finite() || !l.im.is_finite()) {
        return Err(TuringError::degenerate("non-finite eigenvalue"));
    }
    Ok(eigs)
}

/// Eigenvalue with the largest real part, ignoring zero modes |λ| ≤ tol
fn leading_eigenvalue(eigs: &[Complex<f64>], tol: f64) -> Option<Complex<f64>> {
    eigs.iter()
        .filter(|l| l.norm() > tol)
        .copied()
        .max_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)))
}

fn infinity_norm(m: &DMatrix<f64>) -> f64 {
    m.row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Largest real eigenvalue part of J − q²D for each wavenumber
///
/// Zero modes are kept, so the curve is the raw dispersion relation.
pub fn dispersion_curve(jacobian: &DMatrix<f64>, diffusion: &[f64], wavenumbers: &[f64]) -> TuringResult<Vec<f64>> {
    if jacobian.nrows() != jacobian.ncols() || diffusion.len() != jacobian.nrows() {
        return Err(TuringError::config("Jacobian and diffusion dimensions disagree"));
    }
    wavenumbers
        .iter()
        .map(|&q| {
            let eigs = eigenvalues(&stability_matrix(jacobian, diffusion, q))?;
            Ok(eigs.iter().map(|l| l.re).fold(f64::NEG_INFINITY, f64::max))
        })
        .collect()
}
