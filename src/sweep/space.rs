//! Lazily decoded Cartesian product of candidate values
//!
//! Axes are ordered: reaction parameters (model order), then diffusion
//! constants (species order), then initial conditions (species order).
//! The last axis varies fastest, so combination k is the mixed-radix
//! number with digits kᵢ ∈ [0, |axisᵢ|).

use crate::error::{TuringError, TuringResult};
use crate::model::ReactionModel;
use crate::params::{ParamKind, ParameterSet};

/// One point of the sweep space
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Position in enumeration order
    pub index: usize,
    pub reaction_params: Vec<f64>,
    pub diffusion_constants: Vec<f64>,
    pub initial_condition: Vec<f64>,
}

/// Sweep space over a validated [`ParameterSet`]
#[derive(Debug, Clone)]
pub struct SweepSpace {
    axes: Vec<Vec<f64>>,
    n_reaction: usize,
    n_species: usize,
    total: usize,
}

impl SweepSpace {
    pub fn new(model: &ReactionModel, params: &ParameterSet) -> TuringResult<Self> {
        params.validate(model)?;

        let mut axes = params.resolved(model, ParamKind::Reaction);
        axes.extend(params.resolved(model, ParamKind::Diffusion));
        axes.extend(params.resolved(model, ParamKind::InitialCondition));

        let total = axes.iter().try_fold(1usize, |acc, axis| acc.checked_mul(axis.len()));
        let total = total.ok_or_else(|| TuringError::config("parameter space size overflows usize"))?;

        Ok(Self {
            axes,
            n_reaction: model.n_parameters(),
            n_species: model.n_species(),
            total,
        })
    }

    /// Number of combinations
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Candidate count per axis, in enumeration order
    pub fn axis_sizes(&self) -> Vec<usize> {
        self.axes.iter().map(Vec::len).collect()
    }

    /// Decode combination `index`; `None` past the end
    pub fn combination(&self, index: usize) -> Option<Combination> {
        if index >= self.total {
            return None;
        }

        let mut values = vec![0.0; self.axes.len()];
        let mut rest = index;
        for (slot, axis) in values.iter_mut().zip(&self.axes).rev() {
            *slot = axis[rest % axis.len()];
            rest /= axis.len();
        }

        let initial_condition = values.split_off(self.n_reaction + self.n_species);
        let diffusion_constants = values.split_off(self.n_reaction);
        Some(Combination {
            index,
            reaction_params: values,
            diffusion_constants,
            initial_condition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ReactionModel {
        ReactionModel::builder()
            .species(["u", "v"])
            .parameters(["a", "b"])
            .degradation("u", "a")
            .degradation("v", "b")
            .build()
            .unwrap()
    }

    #[test]
    fn test_size_is_product() {
        let params = ParameterSet::new()
            .with_reaction("a", [1.0, 2.0, 3.0])
            .with_reaction("b", [1.0, 2.0])
            .with_diffusion("v", [10.0, 20.0]);
        let space = SweepSpace::new(&model(), &params).unwrap();
        assert_eq!(space.len(), 12);
        assert_eq!(space.axis_sizes(), vec![3, 2, 1, 2, 1, 1]);
    }

    #[test]
    fn test_last_axis_fastest() {
        let params = ParameterSet::new()
            .with_reaction("a", [1.0, 2.0])
            .with_reaction("b", [5.0])
            .with_initial_condition("v", [0.1, 0.2, 0.3]);
        let space = SweepSpace::new(&model(), &params).unwrap();

        let c0 = space.combination(0).unwrap();
        assert_eq!(c0.reaction_params, vec![1.0, 5.0]);
        assert_eq!(c0.diffusion_constants, vec![0.0, 0.0]);
        assert_eq!(c0.initial_condition, vec![1.0, 0.1]);

        let c1 = space.combination(1).unwrap();
        assert_eq!(c1.initial_condition, vec![1.0, 0.2]);

        let c3 = space.combination(3).unwrap();
        assert_eq!(c3.reaction_params, vec![2.0, 5.0]);
        assert_eq!(c3.initial_condition, vec![1.0, 0.1]);

        assert!(space.combination(6).is_none());
    }

    #[test]
    fn test_missing_reaction_parameter_rejected() {
        let params = ParameterSet::new().with_reaction("a", [1.0]);
        assert!(SweepSpace::new(&model(), &params).is_err());
    }
}
