//! Sweep results and lookups over Turing records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TuringError, TuringResult};
use crate::model::ReactionModel;
use crate::params::{ParamKind, ParameterSet, DEFAULT_INITIAL_NOISE};

/// Domain length used for follow-up simulations, in wavelengths
pub const DOMAIN_WAVELENGTHS: f64 = 3.0;

/// A parameter combination that produces a Turing instability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuringRecord {
    /// Position in the sweep's enumeration order
    pub combination_index: usize,
    /// Homogeneous steady state (model species order)
    pub steady_state: Vec<f64>,
    /// Reaction parameters (model parameter order)
    pub reaction_params: Vec<f64>,
    /// Diffusion constants (species order)
    pub diffusion_constants: Vec<f64>,
    /// Seed concentrations the steady state was reached from
    pub initial_conditions: Vec<f64>,
    /// ±1 per species, first non-negligible species +1
    pub pattern_phase: Vec<i8>,
    /// Dominant wavelength 2π/q*
    pub wavelength: f64,
    /// Growth rate of the dominant mode (> 0)
    pub max_real_eigenvalue: f64,
    /// Dominant mode is real
    pub non_oscillatory: bool,
}

/// Per-outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub total: usize,
    pub pattern_forming: usize,
    pub non_pattern_forming: usize,
    /// Steady state not reached
    pub convergence_failures: usize,
    /// Stability matrix could not be decomposed
    pub degenerate: usize,
}

impl SweepSummary {
    /// Combinations without a record
    pub fn skipped(&self) -> usize {
        self.non_pattern_forming + self.convergence_failures + self.degenerate
    }

    /// Add the counts of another batch
    pub(crate) fn merge(&mut self, other: &SweepSummary) {
        self.total += other.total;
        self.pattern_forming += other.pattern_forming;
        self.non_pattern_forming += other.non_pattern_forming;
        self.convergence_failures += other.convergence_failures;
        self.degenerate += other.degenerate;
    }

    /// Fraction of the space that is pattern-forming
    pub fn pattern_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.pattern_forming as f64 / self.total as f64
        }
    }
}

/// Output of [`ParameterSweep::run`](super::ParameterSweep::run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Pattern-forming combinations in enumeration order
    pub records: Vec<TuringRecord>,
    pub summary: SweepSummary,
}

impl SweepResult {
    pub fn record(&self, i: usize) -> Option<&TuringRecord> {
        self.records.get(i)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TuringRecord> {
        self.records.iter()
    }
}

/// Values of one named parameter across `records`, in record order
///
/// `name` is a reaction parameter for [`ParamKind::Reaction`] and a species
/// otherwise.
pub fn get_param(
    model: &ReactionModel,
    records: &[TuringRecord],
    name: &str,
    kind: ParamKind,
) -> TuringResult<Vec<f64>> {
    let index = match kind {
        ParamKind::Reaction => model.parameter_index(name),
        ParamKind::Diffusion | ParamKind::InitialCondition => model.species_index(name),
    }
    .ok_or_else(|| TuringError::config(format!("unknown {:?} name '{}'", kind, name)))?;

    records
        .iter()
        .map(|record| {
            let values = match kind {
                ParamKind::Reaction => &record.reaction_params,
                ParamKind::Diffusion => &record.diffusion_constants,
                ParamKind::InitialCondition => &record.initial_conditions,
            };
            values.get(index).copied().ok_or_else(|| {
                TuringError::config(format!(
                    "record {} does not match the model ({} values)",
                    record.combination_index,
                    values.len()
                ))
            })
        })
        .collect()
}

/// Single-valued parameter set for simulating `record`
///
/// The simulation starts from the steady state on a domain of three
/// wavelengths with the default noise amplitude and a fresh seed.
pub fn get_params(model: &ReactionModel, record: &TuringRecord) -> TuringResult<ParameterSet> {
    if record.reaction_params.len() != model.n_parameters()
        || record.diffusion_constants.len() != model.n_species()
        || record.steady_state.len() != model.n_species()
    {
        return Err(TuringError::config(format!(
            "record {} does not match the model",
            record.combination_index
        )));
    }

    let single = |names: &[String], values: &[f64]| -> BTreeMap<String, Vec<f64>> {
        names
            .iter()
            .zip(values)
            .map(|(name, v)| (name.clone(), vec![*v]))
            .collect()
    };

    Ok(ParameterSet {
        reaction: single(model.parameters(), &record.reaction_params),
        diffusion: single(model.species(), &record.diffusion_constants),
        initial_condition: single(model.species(), &record.steady_state),
        initial_noise: DEFAULT_INITIAL_NOISE,
        domain_size: Some(DOMAIN_WAVELENGTHS * record.wavelength),
        random_seed: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_merge_by_count() {
        let mut a = SweepSummary {
            total: 5,
            pattern_forming: 1,
            non_pattern_forming: 2,
            convergence_failures: 1,
            degenerate: 1,
        };
        let b = SweepSummary {
            total: 3,
            pattern_forming: 2,
            non_pattern_forming: 1,
            ..Default::default()
        };
        a.merge(&b);
        a.merge(&SweepSummary::default());
        assert_eq!(a.total, 8);
        assert_eq!(a.pattern_forming, 3);
        assert_eq!(a.pattern_forming + a.skipped(), a.total);
    }

    fn model() -> ReactionModel {
        ReactionModel::builder()
            .species(["u", "v"])
            .parameters(["a", "b"])
            .degradation("u", "a")
            .degradation("v", "b")
            .build()
            .unwrap()
    }

    fn record(index: usize, a: f64) -> TuringRecord {
        TuringRecord {
            combination_index: index,
            steady_state: vec![1.0, 2.0],
            reaction_params: vec![a, 0.5],
            diffusion_constants: vec![1.0, 20.0],
            initial_conditions: vec![1.0, 1.0],
            pattern_phase: vec![1, -1],
            wavelength: 4.0,
            max_real_eigenvalue: 0.2,
            non_oscillatory: true,
        }
    }

    #[test]
    fn test_get_param_in_record_order() {
        let records = vec![record(0, 0.1), record(5, 0.3)];
        let a = get_param(&model(), &records, "a", ParamKind::Reaction).unwrap();
        assert_eq!(a, vec![0.1, 0.3]);
        let dv = get_param(&model(), &records, "v", ParamKind::Diffusion).unwrap();
        assert_eq!(dv, vec![20.0, 20.0]);
        assert!(get_param(&model(), &records, "w", ParamKind::Diffusion).is_err());
    }

    #[test]
    fn test_get_params_defaults() {
        let model = model();
        let params = get_params(&model, &record(3, 0.1)).unwrap();
        params.validate(&model).unwrap();
        assert_eq!(params.domain_size, Some(12.0));
        assert_eq!(params.initial_condition["v"], vec![2.0]);
        assert_eq!(params.initial_noise, DEFAULT_INITIAL_NOISE);
        assert!(params.random_seed.is_none());
    }

    #[test]
    fn test_summary_skipped() {
        let summary = SweepSummary {
            total: 10,
            pattern_forming: 3,
            non_pattern_forming: 4,
            convergence_failures: 2,
            degenerate: 1,
        };
        assert_eq!(summary.skipped() + summary.pattern_forming, summary.total);
        assert!((summary.pattern_fraction() - 0.3).abs() < 1e-12);
    }
}
