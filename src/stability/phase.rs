//! Pattern phase: relative sign of each species in the dominant mode
//!
//! At onset, a Turing pattern looks like C*(x) + ε·v·cos(q*x), where v is
//! the eigenvector of M(q*) for the dominant eigenvalue λ*. Species whose
//! components share a sign peak together (in phase); opposite signs give
//! anti-phase stripes.
//!
//! Eigenvectors are only defined up to a complex scalar, so the signs are
//! canonicalized:
//!
//! 1. rotate v so its largest component is real positive
//! 2. take the sign of each real part (+1 for negligible components)
//! 3. flip all signs so the first non-negligible component is +1

use nalgebra::{Complex, DMatrix, DVector};

use crate::error::{TuringError, TuringResult};

/// Components below this fraction of the largest magnitude count as zero
const NEGLIGIBLE_FRACTION: f64 = 1e-6;
const INVERSE_ITERATIONS: usize = 8;
/// Relative shifts tried when M − λI is numerically singular
const SHIFT_OFFSETS: [f64; 3] = [1e-10, 1e-7, 1e-4];

/// Eigenvector of `m` for the (known) eigenvalue `lambda`
///
/// Complex inverse iteration on (M − (λ + δ)I), normalized to unit length.
pub fn dominant_eigenvector(m: &DMatrix<f64>, lambda: Complex<f64>) -> TuringResult<DVector<Complex<f64>>> {
    let n = m.nrows();
    let complex_m: DMatrix<Complex<f64>> = m.map(|v| Complex::new(v, 0.0));
    let scale = 1.0 + lambda.norm();

    for offset in SHIFT_OFFSETS {
        let shift = lambda + Complex::new(offset * scale, 0.0);
        let mut shifted = complex_m.clone();
        for i in 0..n {
            shifted[(i, i)] -= shift;
        }
        let lu = shifted.lu();

        let mut v = DVector::from_fn(n, |i, _| Complex::new(1.0 + 0.1 * i as f64, 0.0));
        let mut converged = true;
        for _ in 0..INVERSE_ITERATIONS {
            let Some(next) = lu.solve(&v) else {
                converged = false;
                break;
            };
            let norm = next.norm();
            if !norm.is_finite() || norm == 0.0 {
                converged = false;
                break;
            }
            v = next.unscale(norm);
        }
        if converged {
            return Ok(v);
        }
    }

    Err(TuringError::degenerate(format!(
        "inverse iteration failed for eigenvalue {:.4e}{:+.4e}i",
        lambda.re, lambda.im
    )))
}

/// Canonical ±1 sign per component of an eigenvector
///
/// The result is identical for `v` and `c·v` for any nonzero complex `c`
/// (up to rounding in the rotation).
pub fn canonical_phase(v: &[Complex<f64>]) -> Vec<i8> {
    let largest = v
        .iter()
        .enumerate()
        .fold((0, 0.0), |(bi, bn), (i, c)| if c.norm() > bn { (i, c.norm()) } else { (bi, bn) });
    let (pivot, max_norm) = largest;
    if max_norm == 0.0 || !max_norm.is_finite() {
        return vec![1; v.len()];
    }

    let rotation = v[pivot].conj() / max_norm;
    let threshold = NEGLIGIBLE_FRACTION * max_norm;

    let mut phase: Vec<i8> = v
        .iter()
        .map(|c| {
            let rotated = c * rotation;
            if c.norm() <= threshold || rotated.re >= 0.0 {
                1
            } else {
                -1
            }
        })
        .collect();

    let first = v.iter().position(|c| c.norm() > threshold);
    if let Some(first) = first {
        if phase[first] < 0 {
            for (sign, c) in phase.iter_mut().zip(v) {
                if c.norm() > threshold {
                    *sign = -*sign;
                }
            }
        }
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(values: &[f64]) -> Vec<Complex<f64>> {
        values.iter().map(|&x| Complex::new(x, 0.0)).collect()
    }

    #[test]
    fn test_first_component_positive() {
        assert_eq!(canonical_phase(&real(&[-0.3, 0.9])), vec![1, -1]);
        assert_eq!(canonical_phase(&real(&[0.3, 0.9])), vec![1, 1]);
    }

    #[test]
    fn test_negligible_components_are_positive() {
        let phase = canonical_phase(&real(&[0.0, -1.0, 1e-12, 0.5]));
        assert_eq!(phase, vec![1, 1, 1, -1]);
    }

    #[test]
    fn test_complex_rotation_invariance() {
        let v = vec![Complex::new(0.6, 0.0), Complex::new(-0.8, 0.0), Complex::new(0.2, 0.0)];
        let expected = canonical_phase(&v);
        for angle in [0.3_f64, 1.7, 3.0, -2.2] {
            let c = Complex::from_polar(2.5, angle);
            let rotated: Vec<_> = v.iter().map(|x| x * c).collect();
            assert_eq!(canonical_phase(&rotated), expected);
        }
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(canonical_phase(&real(&[0.0, 0.0])), vec![1, 1]);
    }

    #[test]
    fn test_inverse_iteration_recovers_eigenvector() {
        // Eigenvalues 3 and -1; eigenvector for 3 is (1, 1)
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let v = dominant_eigenvector(&m, Complex::new(3.0, 0.0)).unwrap();
        let ratio = v[1] / v[0];
        assert!((ratio.re - 1.0).abs() < 1e-8);
        assert!(ratio.im.abs() < 1e-8);
        assert_eq!(canonical_phase(v.as_slice()), vec![1, 1]);
    }
}
