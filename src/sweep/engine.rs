//! Parallel sweep: steady state → stability for every combination
//!
//! ```text
//!   SweepSpace ── indices 0..K ── batches of batch_size ──► rayon workers
//!                                                              │
//!                 solve → analyze per index                    │
//!                                                              ▼
//!   SweepResult ◄── sort by index ◄── merge batches ◄──────────┘
//! ```
//!
//! Workers share only the model and the sweep space. Each batch keeps only
//! its Turing records and outcome counts; a failed combination is logged
//! and counted where it happens and never touches its neighbours.

use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::record::{SweepResult, SweepSummary, TuringRecord};
use super::space::{Combination, SweepSpace};
use crate::error::{ConvergenceFailure, TuringError, TuringResult};
use crate::model::ReactionModel;
use crate::params::{ParameterSet, SweepOptions};
use crate::stability::StabilityAnalyzer;
use crate::steady_state::SteadyStateSolver;

/// What happened to one combination
#[derive(Debug, Clone, PartialEq)]
pub enum CombinationOutcome {
    PatternForming(Box<TuringRecord>),
    NotPatternForming,
    ConvergenceFailure(ConvergenceFailure),
    Degenerate(String),
}

/// Turing screen over a Cartesian parameter space
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    model: ReactionModel,
    space: SweepSpace,
    options: SweepOptions,
    solver: SteadyStateSolver,
    analyzer: StabilityAnalyzer,
}

impl ParameterSweep {
    /// Validate `params` and `options` against `model`
    pub fn new(model: &ReactionModel, params: &ParameterSet, options: SweepOptions) -> TuringResult<Self> {
        options.validate()?;
        let space = SweepSpace::new(model, params)?;
        Ok(Self {
            model: model.clone(),
            solver: SteadyStateSolver::new(&options),
            analyzer: StabilityAnalyzer::new(options.stability.clone()),
            space,
            options,
        })
    }

    pub fn space(&self) -> &SweepSpace {
        &self.space
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    /// Steady state and stability for a single combination
    ///
    /// Convergence failures and degenerate stability matrices are outcomes;
    /// any other error means the combination was malformed and is returned.
    pub fn evaluate(&self, combination: &Combination) -> TuringResult<CombinationOutcome> {
        let steady_state = match self.solver.solve(
            &self.model,
            &combination.reaction_params,
            &combination.initial_condition,
        ) {
            Ok(ss) => ss,
            Err(failure) => return Ok(CombinationOutcome::ConvergenceFailure(failure)),
        };

        let report = match self.analyzer.analyze(
            &self.model,
            &steady_state.values,
            &combination.reaction_params,
            &combination.diffusion_constants,
        ) {
            Ok(report) => report,
            Err(TuringError::DegenerateStabilityMatrix(reason)) => {
                return Ok(CombinationOutcome::Degenerate(reason))
            }
            Err(err) => return Err(err),
        };

        let outcome = match report.wavelength {
            Some(wavelength) if report.is_turing_unstable() => {
                CombinationOutcome::PatternForming(Box::new(TuringRecord {
                    combination_index: combination.index,
                    steady_state: steady_state.values,
                    reaction_params: combination.reaction_params.clone(),
                    diffusion_constants: combination.diffusion_constants.clone(),
                    initial_conditions: combination.initial_condition.clone(),
                    pattern_phase: report.pattern_phase,
                    wavelength,
                    max_real_eigenvalue: report.max_real_eigenvalue,
                    non_oscillatory: report.non_oscillatory,
                }))
            }
            _ => CombinationOutcome::NotPatternForming,
        };
        Ok(outcome)
    }

    /// Evaluate indices `[start, end)` sequentially, keeping only records and counts
    fn run_batch(&self, start: usize, end: usize) -> TuringResult<(Vec<TuringRecord>, SweepSummary)> {
        let mut records = Vec::new();
        let mut summary = SweepSummary::default();
        for combination in (start..end).filter_map(|k| self.space.combination(k)) {
            summary.total += 1;
            match self.evaluate(&combination)? {
                CombinationOutcome::PatternForming(record) => {
                    summary.pattern_forming += 1;
                    records.push(*record);
                }
                CombinationOutcome::NotPatternForming => summary.non_pattern_forming += 1,
                CombinationOutcome::ConvergenceFailure(failure) => {
                    log::debug!("Combination {}: {}", combination.index, failure);
                    summary.convergence_failures += 1;
                }
                CombinationOutcome::Degenerate(reason) => {
                    log::debug!("Combination {}: {}", combination.index, reason);
                    summary.degenerate += 1;
                }
            }
        }
        Ok((records, summary))
    }

    /// Screen the whole space
    pub fn run(&self) -> TuringResult<SweepResult> {
        let total = self.space.len();
        let batch_size = self.options.batch_size;
        let n_batches = total.div_ceil(batch_size);

        log::info!(
            "Sweep: {} combinations in {} batches of up to {} (threads: {})",
            total,
            n_batches,
            batch_size,
            self.options
                .threads
                .map_or_else(|| "default".to_string(), |n| n.to_string())
        );
        let start = Instant::now();

        let dispatch = || -> TuringResult<(Vec<TuringRecord>, SweepSummary)> {
            (0..n_batches)
                .into_par_iter()
                .map(|b| {
                    let lo = b * batch_size;
                    let hi = (lo + batch_size).min(total);
                    let batch = self.run_batch(lo, hi);
                    log::debug!("Sweep: batch {}/{} done ({}..{})", b + 1, n_batches, lo, hi);
                    batch
                })
                .try_reduce(
                    || (Vec::new(), SweepSummary::default()),
                    |(mut records, mut summary), (more, counts)| {
                        records.extend(more);
                        summary.merge(&counts);
                        Ok((records, summary))
                    },
                )
        };

        let (mut records, summary) = match self.options.threads {
            Some(n) => ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| TuringError::ThreadPool(e.to_string()))?
                .install(dispatch)?,
            None => dispatch()?,
        };
        records.sort_unstable_by_key(|r| r.combination_index);

        log::info!(
            "Sweep finished in {:.2?}: {} pattern-forming, {} not, {} convergence failures, {} degenerate",
            start.elapsed(),
            summary.pattern_forming,
            summary.non_pattern_forming,
            summary.convergence_failures,
            summary.degenerate
        );

        Ok(SweepResult { records, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamKind;
    use crate::sweep::get_param;
    use crate::systems::{ReferenceSystem, Schnakenberg};

    fn schnakenberg_screen() -> (ReactionModel, ParameterSet) {
        let system = Schnakenberg::default();
        let model = system.model().unwrap();
        let params = ParameterSet::new()
            .with_reaction("a", [0.05, 0.1, 0.2])
            .with_reaction("b", [0.5, 0.9, 1.5])
            .with_diffusion("u", [1.0])
            .with_diffusion("v", [1.0, 40.0]);
        (model, params)
    }

    #[test]
    fn test_counts_add_up() {
        let (model, params) = schnakenberg_screen();
        let result = ParameterSweep::new(&model, &params, SweepOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(result.summary.total, 18);
        assert_eq!(result.len() + result.summary.skipped(), 18);
        assert!(!result.is_empty());
        // Equal diffusion never patterns
        assert!(result.iter().all(|r| r.diffusion_constants[1] == 40.0));
        let mut indices: Vec<usize> = result.iter().map(|r| r.combination_index).collect();
        indices.dedup();
        assert_eq!(indices.len(), result.len());
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_turing_record_matches_known_point() {
        let (model, params) = schnakenberg_screen();
        let sweep = ParameterSweep::new(&model, &params, SweepOptions::default()).unwrap();
        let result = sweep.run().unwrap();
        let a = get_param(&model, &result.records, "a", ParamKind::Reaction).unwrap();
        let b = get_param(&model, &result.records, "b", ParamKind::Reaction).unwrap();
        assert!(a.iter().zip(&b).any(|(a, b)| *a == 0.1 && *b == 0.9));
        for record in result.iter() {
            assert!(record.max_real_eigenvalue > 0.0);
            assert!(record.wavelength > 0.0);
            assert_eq!(record.pattern_phase[0], 1);
        }
    }

    #[test]
    fn test_invalid_configuration_is_rejected_up_front() {
        let (model, params) = schnakenberg_screen();
        let bad = params.clone().with_diffusion("v", [-1.0]);
        assert!(matches!(
            ParameterSweep::new(&model, &bad, SweepOptions::default()),
            Err(TuringError::InvalidParameterConfiguration(_))
        ));
        let unknown = params.with_reaction("c", [1.0]);
        assert!(ParameterSweep::new(&model, &unknown, SweepOptions::default()).is_err());
    }

    /// x settles at p; one rate turns NaN as soon as x rises above p
    fn fragile_model() -> ReactionModel {
        ReactionModel::builder()
            .species(["x"])
            .parameters(["p"])
            .reaction(&[("x", 1)], |_, p| p[0])
            .reaction(&[("x", -1)], |c, _| c[0])
            .reaction(&[("x", 1)], |c, p| if c[0] > p[0] + 1e-12 { f64::NAN } else { 0.0 })
            .build()
            .unwrap()
    }

    #[test]
    fn test_degenerate_and_non_finite_are_counted() {
        let model = fragile_model();
        // x0 = 1 is already steady but the Jacobian is NaN; x0 = 2 has NaN rates
        let params = ParameterSet::new()
            .with_reaction("p", [1.0])
            .with_initial_condition("x", [1.0, 2.0]);
        let sweep = ParameterSweep::new(&model, &params, SweepOptions::default()).unwrap();

        let degenerate = sweep.evaluate(&sweep.space().combination(0).unwrap()).unwrap();
        assert!(matches!(degenerate, CombinationOutcome::Degenerate(_)));
        let non_finite = sweep.evaluate(&sweep.space().combination(1).unwrap()).unwrap();
        assert!(matches!(
            non_finite,
            CombinationOutcome::ConvergenceFailure(ConvergenceFailure::NonFinite { .. })
        ));

        let result = sweep.run().unwrap();
        assert!(result.is_empty());
        assert_eq!(result.summary.total, 2);
        assert_eq!(result.summary.degenerate, 1);
        assert_eq!(result.summary.convergence_failures, 1);
        assert_eq!(result.summary.skipped(), 2);
    }

    #[test]
    fn test_malformed_combination_is_an_error() {
        let (model, params) = schnakenberg_screen();
        let sweep = ParameterSweep::new(&model, &params, SweepOptions::default()).unwrap();
        let combination = Combination {
            index: 0,
            reaction_params: vec![0.1, 0.9],
            diffusion_constants: vec![1.0],
            initial_condition: vec![1.0, 1.0],
        };
        assert!(matches!(
            sweep.evaluate(&combination),
            Err(TuringError::InvalidParameterConfiguration(_))
        ));
    }

    #[test]
    fn test_convergence_failures_are_counted() {
        let (model, params) = schnakenberg_screen();
        let options = SweepOptions {
            max_iterations: 1,
            ..Default::default()
        };
        let result = ParameterSweep::new(&model, &params, options).unwrap().run().unwrap();
        assert_eq!(result.summary.convergence_failures, 18);
        assert!(result.is_empty());
    }
}
