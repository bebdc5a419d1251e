//! Rate-law helpers for building reaction models
//!
//! Rates are plain closures over `(concentrations, parameters)` slices,
//! indexed by the model's species and parameter order. The helpers here
//! cover the kinetics used by the reference systems:
//!
//! - Mass action: `k · Π cᵢ^νᵢ`
//! - Hill activation: `μ · xⁿ / (Kⁿ + xⁿ)`
//! - Repressive Hill: `μ / (1 + (x/K)ⁿ)`

use std::sync::Arc;

/// Shared rate function: `(concentrations, parameters) -> rate`
pub type RateFn = Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;

/// Activating Hill function `xⁿ / (Kⁿ + xⁿ)` (without the maximal rate)
pub fn hill(x: f64, k: f64, n: f64) -> f64 {
    let x = x.max(0.0);
    let xn = x.powf(n);
    let denom = k.powf(n) + xn;
    if denom == 0.0 {
        0.0
    } else {
        xn / denom
    }
}

/// Repressive Hill function `μ / (1 + (x/K)ⁿ)`
pub fn hillr(x: f64, vmax: f64, k: f64, n: f64) -> f64 {
    vmax / ((x.max(0.0) / k).powf(n) + 1.0)
}

/// Mass-action rate `k · Π c^order` with `k` taken from the parameter vector
pub fn mass_action(rate_param: usize, reactants: Vec<(usize, u32)>) -> RateFn {
    Arc::new(move |c: &[f64], p: &[f64]| {
        reactants
            .iter()
            .fold(p[rate_param], |acc, &(species, order)| acc * c[species].powi(order as i32))
    })
}

/// Hill-type production rate driven by one input species
///
/// All of `vmax`, `k` and `n` are parameter indices.
pub fn hill_rate(input: usize, vmax: usize, k: usize, n: usize, repressive: bool) -> RateFn {
    if repressive {
        Arc::new(move |c: &[f64], p: &[f64]| hillr(c[input], p[vmax], p[k], p[n]))
    } else {
        Arc::new(move |c: &[f64], p: &[f64]| p[vmax] * hill(c[input], p[k], p[n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hill_half_saturation() {
        assert!((hill(2.0, 2.0, 4.0) - 0.5).abs() < 1e-12);
        assert!((hillr(2.0, 3.0, 2.0, 4.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_hill_limits() {
        assert_eq!(hill(0.0, 1.0, 2.0), 0.0);
        assert!((hillr(0.0, 5.0, 1.0, 8.0) - 5.0).abs() < 1e-12);
        // Negative inputs are treated as zero rather than producing NaN
        assert!(hillr(-1.0, 1.0, 1.0, 2.5).is_finite());
    }

    #[test]
    fn test_mass_action_bimolecular() {
        let rate = mass_action(0, vec![(0, 1), (1, 2)]);
        let value = rate(&[2.0, 3.0], &[0.5]);
        assert!((value - 0.5 * 2.0 * 9.0).abs() < 1e-12);
    }
}
