//! Reaction Model: Species, Stoichiometry and Rate Functions
//!
//! A reaction network is reduced to three pieces of plain data:
//!
//! - an ordered species list (size N)
//! - an N×R integer stoichiometry matrix S (net change per reaction)
//! - R rate functions rᵣ(C, p)
//!
//! so that the well-mixed kinetics read
//!
//!   dC/dt = S · r(C, p)
//!
//! The model also declares its parameter names; rate functions receive
//! parameters as a slice in that order. Models are immutable once built
//! and cheap to clone (rate functions are shared).

pub mod kinetics;

use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;

use crate::error::{TuringError, TuringResult};

pub use kinetics::RateFn;

/// Immutable reaction network
#[derive(Clone)]
pub struct ReactionModel {
    /// Species names, in state-vector order
    species: Vec<String>,
    /// Parameter names, in parameter-vector order
    parameters: Vec<String>,
    /// N×R net stoichiometry
    stoichiometry: Array2<i32>,
    /// One rate function per reaction (column of `stoichiometry`)
    rates: Vec<RateFn>,
}

impl fmt::Debug for ReactionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactionModel")
            .field("species", &self.species)
            .field("parameters", &self.parameters)
            .field("stoichiometry", &self.stoichiometry)
            .field("n_reactions", &self.rates.len())
            .finish()
    }
}

impl ReactionModel {
    /// Assemble a model from already-resolved parts
    pub fn new(
        species: Vec<String>,
        parameters: Vec<String>,
        stoichiometry: Array2<i32>,
        rates: Vec<RateFn>,
    ) -> TuringResult<Self> {
        if species.is_empty() {
            return Err(TuringError::model("model must declare at least one species"));
        }
        let (rows, cols) = stoichiometry.dim();
        if rows != species.len() {
            return Err(TuringError::model(format!(
                "stoichiometry has {} rows but {} species are declared",
                rows,
                species.len()
            )));
        }
        if cols != rates.len() {
            return Err(TuringError::model(format!(
                "stoichiometry has {} columns but {} rate functions were given",
                cols,
                rates.len()
            )));
        }
        check_unique(&species, "species")?;
        check_unique(&parameters, "parameter")?;

        Ok(Self {
            species,
            parameters,
            stoichiometry,
            rates,
        })
    }

    /// Start building a model by name
    pub fn builder() -> ReactionModelBuilder {
        ReactionModelBuilder::default()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn stoichiometry(&self) -> &Array2<i32> {
        &self.stoichiometry
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn n_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn n_reactions(&self) -> usize {
        self.rates.len()
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s == name)
    }

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p == name)
    }

    /// Evaluate every reaction rate at `c`
    pub fn reaction_rates(&self, c: &[f64], params: &[f64]) -> Vec<f64> {
        self.rates.iter().map(|rate| rate(c, params)).collect()
    }

    /// dC/dt = S · r(C, p), written into `out`
    pub fn rate_of_change(&self, c: &[f64], params: &[f64], out: &mut [f64]) {
        out.iter_mut().for_each(|v| *v = 0.0);
        for (r, rate) in self.rates.iter().enumerate() {
            let value = rate(c, params);
            for (i, slot) in out.iter_mut().enumerate() {
                let nu = self.stoichiometry[[i, r]];
                if nu != 0 {
                    *slot += nu as f64 * value;
                }
            }
        }
    }

    /// Allocating variant of [`rate_of_change`](Self::rate_of_change)
    pub fn derivative(&self, c: &[f64], params: &[f64]) -> DVector<f64> {
        let mut out = DVector::zeros(self.n_species());
        self.rate_of_change(c, params, out.as_mut_slice());
        out
    }

    /// Reaction Jacobian J[i][j] = Σᵣ S[i][r] · ∂rᵣ/∂Cⱼ
    ///
    /// Rate derivatives use central differences with step ε^(1/3)·max(|Cⱼ|, 1).
    /// Near zero concentration a forward difference is used instead so that
    /// rate functions are never evaluated at negative concentrations.
    pub fn jacobian(&self, c: &[f64], params: &[f64]) -> DMatrix<f64> {
        let n = self.n_species();
        let n_r = self.n_reactions();
        let central_step = f64::EPSILON.cbrt();
        let forward_step = f64::EPSILON.sqrt();

        // ∂r/∂C, R×N
        let mut rate_jac = DMatrix::<f64>::zeros(n_r, n);
        let mut probe = c.to_vec();

        for j in 0..n {
            let scale = c[j].abs().max(1.0);
            let h = central_step * scale;

            if c[j] >= h {
                probe[j] = c[j] + h;
                let plus = self.reaction_rates(&probe, params);
                probe[j] = c[j] - h;
                let minus = self.reaction_rates(&probe, params);
                for r in 0..n_r {
                    rate_jac[(r, j)] = (plus[r] - minus[r]) / (2.0 * h);
                }
            } else {
                let h = forward_step * scale;
                let base = self.reaction_rates(&probe, params);
                probe[j] = c[j] + h;
                let plus = self.reaction_rates(&probe, params);
                for r in 0..n_r {
                    rate_jac[(r, j)] = (plus[r] - base[r]) / h;
                }
            }
            probe[j] = c[j];
        }

        let stoich = DMatrix::from_fn(n, n_r, |i, r| self.stoichiometry[[i, r]] as f64);
        stoich * rate_jac
    }
}

fn check_unique(names: &[String], what: &str) -> TuringResult<()> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(TuringError::model(format!("duplicate {} name '{}'", what, name)));
        }
    }
    Ok(())
}

/// Rate definition awaiting name resolution
enum PendingRate {
    Custom(RateFn),
    MassAction {
        rate_param: String,
        reactants: Vec<(String, u32)>,
    },
    Hill {
        input: String,
        vmax: String,
        k: String,
        n: String,
        repressive: bool,
    },
}

struct PendingReaction {
    changes: Vec<(String, i32)>,
    rate: PendingRate,
}

/// Name-based model builder
///
/// Species and parameter names are resolved at [`build`](Self::build),
/// so reactions may be declared before or after the name lists.
#[derive(Default)]
pub struct ReactionModelBuilder {
    species: Vec<String>,
    parameters: Vec<String>,
    reactions: Vec<PendingReaction>,
}

impl ReactionModelBuilder {
    pub fn species<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.species.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(names.into_iter().map(Into::into));
        self
    }

    /// Reaction with an arbitrary rate closure and explicit net changes
    pub fn reaction<F>(mut self, changes: &[(&str, i32)], rate: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        self.reactions.push(PendingReaction {
            changes: owned_changes(changes),
            rate: PendingRate::Custom(Arc::new(rate)),
        });
        self
    }

    /// Mass-action reaction `reactants --k--> products`
    pub fn mass_action(
        mut self,
        rate_param: &str,
        reactants: &[(&str, u32)],
        products: &[(&str, u32)],
    ) -> Self {
        let mut changes: Vec<(String, i32)> = Vec::new();
        for &(name, order) in reactants {
            changes.push((name.to_string(), -(order as i32)));
        }
        for &(name, order) in products {
            changes.push((name.to_string(), order as i32));
        }
        self.reactions.push(PendingReaction {
            changes,
            rate: PendingRate::MassAction {
                rate_param: rate_param.to_string(),
                reactants: reactants.iter().map(|&(s, o)| (s.to_string(), o)).collect(),
            },
        });
        self
    }

    /// First-order decay `species --k--> ∅`
    pub fn degradation(self, species: &str, rate_param: &str) -> Self {
        self.mass_action(rate_param, &[(species, 1)], &[])
    }

    /// Hill-regulated production `∅ --> target`
    pub fn hill_production(
        mut self,
        target: &str,
        input: &str,
        vmax: &str,
        k: &str,
        n: &str,
        repressive: bool,
    ) -> Self {
        self.reactions.push(PendingReaction {
            changes: vec![(target.to_string(), 1)],
            rate: PendingRate::Hill {
                input: input.to_string(),
                vmax: vmax.to_string(),
                k: k.to_string(),
                n: n.to_string(),
                repressive,
            },
        });
        self
    }

    pub fn build(self) -> TuringResult<ReactionModel> {
        let species_idx = |name: &str| -> TuringResult<usize> {
            self.species
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| TuringError::model(format!("unknown species '{}'", name)))
        };
        let param_idx = |name: &str| -> TuringResult<usize> {
            self.parameters
                .iter()
                .position(|p| p == name)
                .ok_or_else(|| TuringError::model(format!("unknown parameter '{}'", name)))
        };

        let n_r = self.reactions.len();
        let mut stoichiometry = Array2::<i32>::zeros((self.species.len(), n_r));
        let mut rates: Vec<RateFn> = Vec::with_capacity(n_r);

        for (r, reaction) in self.reactions.iter().enumerate() {
            for (name, delta) in &reaction.changes {
                stoichiometry[[species_idx(name)?, r]] += *delta;
            }

            let rate = match &reaction.rate {
                PendingRate::Custom(f) => Arc::clone(f),
                PendingRate::MassAction {
                    rate_param,
                    reactants,
                } => {
                    let resolved = reactants
                        .iter()
                        .map(|(s, o)| species_idx(s).map(|i| (i, *o)))
                        .collect::<TuringResult<Vec<_>>>()?;
                    kinetics::mass_action(param_idx(rate_param)?, resolved)
                }
                PendingRate::Hill {
                    input,
                    vmax,
                    k,
                    n,
                    repressive,
                } => kinetics::hill_rate(
                    species_idx(input)?,
                    param_idx(vmax)?,
                    param_idx(k)?,
                    param_idx(n)?,
                    *repressive,
                ),
            };
            rates.push(rate);
        }

        ReactionModel::new(self.species, self.parameters, stoichiometry, rates)
    }
}

fn owned_changes(changes: &[(&str, i32)]) -> Vec<(String, i32)> {
    changes.iter().map(|&(s, d)| (s.to_string(), d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimerization() -> ReactionModel {
        ReactionModel::builder()
            .species(["A", "B"])
            .parameters(["kf", "kb"])
            .mass_action("kf", &[("A", 2)], &[("B", 1)])
            .mass_action("kb", &[("B", 1)], &[("A", 2)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_stoichiometry_from_builder() {
        let model = dimerization();
        assert_eq!(model.n_species(), 2);
        assert_eq!(model.n_reactions(), 2);
        assert_eq!(model.stoichiometry()[[0, 0]], -2);
        assert_eq!(model.stoichiometry()[[1, 0]], 1);
        assert_eq!(model.stoichiometry()[[0, 1]], 2);
        assert_eq!(model.stoichiometry()[[1, 1]], -1);
    }

    #[test]
    fn test_rate_of_change_conserves_mass() {
        let model = dimerization();
        let d = model.derivative(&[1.5, 0.7], &[2.0, 0.3]);
        // A + 2B is conserved
        assert!((d[0] + 2.0 * d[1]).abs() < 1e-12);
    }

    #[test]
    fn test_jacobian_matches_analytic() {
        let model = dimerization();
        let (a, kf, kb) = (1.5, 2.0, 0.3);
        let j = model.jacobian(&[a, 0.7], &[kf, kb]);
        // dA/dt = -2 kf A² + 2 kb B
        assert!((j[(0, 0)] - (-4.0 * kf * a)).abs() < 1e-6);
        assert!((j[(0, 1)] - 2.0 * kb).abs() < 1e-6);
        assert!((j[(1, 0)] - 2.0 * kf * a).abs() < 1e-6);
        assert!((j[(1, 1)] + kb).abs() < 1e-6);
    }

    #[test]
    fn test_jacobian_at_zero_concentration() {
        let model = dimerization();
        let j = model.jacobian(&[0.0, 0.0], &[2.0, 0.3]);
        assert!(j.iter().all(|v| v.is_finite()));
        assert!(j[(0, 0)].abs() < 1e-6);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let result = ReactionModel::builder()
            .species(["A"])
            .parameters(["k"])
            .degradation("Z", "k")
            .build();
        assert!(matches!(result, Err(TuringError::InvalidModel(_))));
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let result = ReactionModel::builder().species(["A", "A"]).build();
        assert!(result.is_err());
    }
}
