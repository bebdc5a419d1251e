//! Property-based invariants of the linear stability analysis.
//!
//! 1. Equal diffusion never destabilizes a stable Jacobian.
//! 2. Pattern phase is unchanged by negating the eigenvector.
//! 3. Real eigenvectors map to sign(vᵢ)·sign(v₀).
//! 4. Wavelength is 2π/q* with q* in (0, q_max].
//! 5. A finer scan agrees on classification and q*.
//! 6. No diffusion means no q-dependence.

use nalgebra::{Complex, DMatrix};
use proptest::prelude::*;
use turing_screen::stability::{canonical_phase, dispersion_curve};
use turing_screen::{Classification, StabilityAnalyzer, StabilityOptions};

// ── Helpers ─────────────────────────────────────────────────────────────

/// J = −(LLᵀ + 0.1·I + K) with K skew: every eigenvalue has Re λ ≤ −0.1
fn stable_jacobian() -> impl Strategy<Value = DMatrix<f64>> {
    (-2.0..2.0f64, -2.0..2.0f64, -2.0..2.0f64, -3.0..3.0f64).prop_map(|(l11, l21, l22, k)| {
        let p11 = l11 * l11 + 0.1;
        let p12 = l11 * l21;
        let p22 = l21 * l21 + l22 * l22 + 0.1;
        DMatrix::from_row_slice(2, 2, &[-p11, -(p12 + k), -(p12 - k), -p22])
    })
}

fn nonzero_component() -> impl Strategy<Value = f64> {
    prop_oneof![0.01..10.0f64, -10.0..-0.01f64]
}

/// Activator-inhibitor Jacobian; Turing-unstable once Dv/Du ≳ 25
fn activator_inhibitor() -> DMatrix<f64> {
    DMatrix::from_row_slice(2, 2, &[0.8, 1.0, -1.8, -1.0])
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Equal diffusion never forms patterns
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn equal_diffusion_never_turing(j in stable_jacobian(), d in 0.01..100.0f64) {
        let report = StabilityAnalyzer::default().analyze_jacobian(&j, &[d, d]).unwrap();
        prop_assert_eq!(report.classification, Classification::Stable, "J = {}, d = {}", j, d);
        prop_assert!(report.wavelength.is_none());
        prop_assert!(report.pattern_phase.is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Phase is invariant under negation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn phase_invariant_under_negation(
        parts in prop::collection::vec((-5.0..5.0f64, -5.0..5.0f64), 1..6)
    ) {
        let v: Vec<Complex<f64>> = parts.iter().map(|&(re, im)| Complex::new(re, im)).collect();
        let negated: Vec<Complex<f64>> = v.iter().map(|c| -c).collect();
        prop_assert_eq!(canonical_phase(&v), canonical_phase(&negated));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Real eigenvectors: sign relative to the first component
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn real_phase_is_relative_sign(values in prop::collection::vec(nonzero_component(), 1..6)) {
        let v: Vec<Complex<f64>> = values.iter().map(|&x| Complex::new(x, 0.0)).collect();
        let expected: Vec<i8> = values
            .iter()
            .map(|x| if x.signum() == values[0].signum() { 1 } else { -1 })
            .collect();
        let phase = canonical_phase(&v);
        prop_assert_eq!(phase[0], 1);
        prop_assert_eq!(phase, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Wavenumber bounds and scan resolution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wavelength_matches_critical_wavenumber(dv in 30.0..200.0f64) {
        let report = StabilityAnalyzer::default()
            .analyze_jacobian(&activator_inhibitor(), &[1.0, dv])
            .unwrap();
        prop_assert_eq!(report.classification, Classification::TuringUnstable);
        let q = report.critical_wavenumber.unwrap();
        prop_assert!(q > 0.0 && q <= report.q_max);
        let expected = 2.0 * std::f64::consts::PI / q;
        prop_assert!((report.wavelength.unwrap() - expected).abs() <= 1e-12 * expected);
        prop_assert!(report.max_real_eigenvalue > report.tolerance);
    }

    #[test]
    fn finer_scan_agrees(dv in 30.0..200.0f64) {
        let coarse = StabilityAnalyzer::default()
            .analyze_jacobian(&activator_inhibitor(), &[1.0, dv])
            .unwrap();
        let fine = StabilityAnalyzer::new(StabilityOptions {
            scan_points: 2048,
            refine_points: 256,
            ..StabilityOptions::default()
        })
        .analyze_jacobian(&activator_inhibitor(), &[1.0, dv])
        .unwrap();
        prop_assert_eq!(coarse.classification, fine.classification);
        let (qc, qf) = (coarse.critical_wavenumber.unwrap(), fine.critical_wavenumber.unwrap());
        prop_assert!((qc - qf).abs() < 0.01 * qf, "coarse q* = {}, fine q* = {}", qc, qf);
        prop_assert_eq!(coarse.pattern_phase, fine.pattern_phase);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. No diffusion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_diffusion_has_flat_dispersion(j in stable_jacobian(), q in 0.0..50.0f64) {
        let report = StabilityAnalyzer::default().analyze_jacobian(&j, &[0.0, 0.0]).unwrap();
        prop_assert_eq!(report.classification, Classification::NoDiffusion);
        prop_assert_eq!(report.q_max, 0.0);

        let curve = dispersion_curve(&j, &[0.0, 0.0], &[0.0, q]).unwrap();
        prop_assert!((curve[0] - curve[1]).abs() < 1e-12);
    }
}

#[test]
fn dispersion_peak_is_positive_inside_turing_band() {
    let j = activator_inhibitor();
    let qs: Vec<f64> = (0..400).map(|i| i as f64 * 0.005).collect();
    let curve = dispersion_curve(&j, &[1.0, 40.0], &qs).unwrap();
    assert!(curve[0] < 0.0);
    let peak = curve.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(peak > 0.0);
}
