//! Parameter Sets: Candidate Values for Screening and Simulation
//!
//! A [`ParameterSet`] maps names to candidate sequences. For a sweep, the
//! Cartesian product of all sequences is the search space; for a single
//! simulation every sequence must hold exactly one value.
//!
//! Species without a diffusion entry are non-diffusing (D = 0). Species
//! without an initial-condition entry start from 1.0.

mod options;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{TuringError, TuringResult};
use crate::model::ReactionModel;

pub use options::{
    OdeAlgorithm, Sampling, SimulationOptions, StabilityOptions, SweepOptions,
};

/// Default seed concentration for species without an explicit initial condition
pub const DEFAULT_INITIAL_CONCENTRATION: f64 = 1.0;

/// Default amplitude of the normally distributed initial perturbation
pub const DEFAULT_INITIAL_NOISE: f64 = 0.01;

/// Which table a named parameter lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Reaction,
    Diffusion,
    InitialCondition,
}

/// Candidate values for every model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Reaction parameter name -> candidate values
    pub reaction: BTreeMap<String, Vec<f64>>,
    /// Species name -> candidate diffusion coefficients
    pub diffusion: BTreeMap<String, Vec<f64>>,
    /// Species name -> candidate seed concentrations
    pub initial_condition: BTreeMap<String, Vec<f64>>,
    /// Standard deviation of the initial perturbation
    pub initial_noise: f64,
    /// Length of the 1D domain (derived from the wavelength when unset)
    pub domain_size: Option<f64>,
    /// Seed for the initial perturbation (fresh seed when unset)
    pub random_seed: Option<u64>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            reaction: BTreeMap::new(),
            diffusion: BTreeMap::new(),
            initial_condition: BTreeMap::new(),
            initial_noise: DEFAULT_INITIAL_NOISE,
            domain_size: None,
            random_seed: None,
        }
    }
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reaction-parameter candidates (builder style)
    pub fn with_reaction(mut self, name: &str, values: impl Into<Vec<f64>>) -> Self {
        self.reaction.insert(name.to_string(), values.into());
        self
    }

    /// Set diffusion-coefficient candidates (builder style)
    pub fn with_diffusion(mut self, species: &str, values: impl Into<Vec<f64>>) -> Self {
        self.diffusion.insert(species.to_string(), values.into());
        self
    }

    /// Set initial-condition candidates (builder style)
    pub fn with_initial_condition(mut self, species: &str, values: impl Into<Vec<f64>>) -> Self {
        self.initial_condition.insert(species.to_string(), values.into());
        self
    }

    pub fn with_noise(mut self, initial_noise: f64) -> Self {
        self.initial_noise = initial_noise;
        self
    }

    pub fn with_domain_size(mut self, domain_size: f64) -> Self {
        self.domain_size = Some(domain_size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> TuringResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> TuringResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Table for a parameter kind
    pub fn table(&self, kind: ParamKind) -> &BTreeMap<String, Vec<f64>> {
        match kind {
            ParamKind::Reaction => &self.reaction,
            ParamKind::Diffusion => &self.diffusion,
            ParamKind::InitialCondition => &self.initial_condition,
        }
    }

    /// Check names, signs and sizes against `model`.
    ///
    /// Every reaction parameter the model declares must have candidates,
    /// no unknown names are allowed, every candidate list must be
    /// non-empty and finite, and diffusion coefficients, initial
    /// conditions and noise must be nonnegative.
    pub fn validate(&self, model: &ReactionModel) -> TuringResult<()> {
        for name in self.reaction.keys() {
            if model.parameter_index(name).is_none() {
                return Err(TuringError::config(format!(
                    "unknown reaction parameter '{}' (model declares {:?})",
                    name,
                    model.parameters()
                )));
            }
        }
        for name in model.parameters() {
            if !self.reaction.contains_key(name) {
                return Err(TuringError::config(format!(
                    "no values given for reaction parameter '{}'",
                    name
                )));
            }
        }
        for (kind, table) in [
            (ParamKind::Diffusion, &self.diffusion),
            (ParamKind::InitialCondition, &self.initial_condition),
        ] {
            for name in table.keys() {
                if model.species_index(name).is_none() {
                    return Err(TuringError::config(format!(
                        "unknown species '{}' in {:?} table (model species {:?})",
                        name,
                        kind,
                        model.species()
                    )));
                }
            }
        }

        for kind in [ParamKind::Reaction, ParamKind::Diffusion, ParamKind::InitialCondition] {
            for (name, values) in self.table(kind) {
                if values.is_empty() {
                    return Err(TuringError::config(format!(
                        "empty candidate list for {:?} '{}'",
                        kind, name
                    )));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(TuringError::config(format!(
                        "non-finite value {} for {:?} '{}'",
                        bad, kind, name
                    )));
                }
                if kind != ParamKind::Reaction {
                    if let Some(bad) = values.iter().find(|v| **v < 0.0) {
                        return Err(TuringError::config(format!(
                            "negative value {} for {:?} '{}'",
                            bad, kind, name
                        )));
                    }
                }
            }
        }

        if !self.initial_noise.is_finite() || self.initial_noise < 0.0 {
            return Err(TuringError::config(format!(
                "initial_noise must be finite and >= 0, got {}",
                self.initial_noise
            )));
        }
        if let Some(size) = self.domain_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(TuringError::config(format!(
                    "domain_size must be finite and > 0, got {}",
                    size
                )));
            }
        }
        Ok(())
    }

    /// Ordered candidate lists for `kind`, one per model parameter/species
    ///
    /// Missing diffusion entries resolve to `[0.0]`, missing initial
    /// conditions to `[1.0]`. Call [`validate`](Self::validate) first.
    pub fn resolved(&self, model: &ReactionModel, kind: ParamKind) -> Vec<Vec<f64>> {
        let names = match kind {
            ParamKind::Reaction => model.parameters(),
            ParamKind::Diffusion | ParamKind::InitialCondition => model.species(),
        };
        let fallback = match kind {
            ParamKind::Reaction => Vec::new(),
            ParamKind::Diffusion => vec![0.0],
            ParamKind::InitialCondition => vec![DEFAULT_INITIAL_CONCENTRATION],
        };
        names
            .iter()
            .map(|name| {
                self.table(kind)
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| fallback.clone())
            })
            .collect()
    }

    /// Extract single values, failing if any list holds more than one candidate
    pub fn single_values(&self, model: &ReactionModel, kind: ParamKind) -> TuringResult<Vec<f64>> {
        let names = match kind {
            ParamKind::Reaction => model.parameters(),
            ParamKind::Diffusion | ParamKind::InitialCondition => model.species(),
        };
        self.resolved(model, kind)
            .into_iter()
            .zip(names)
            .map(|(values, name)| match values.as_slice() {
                [v] => Ok(*v),
                _ => Err(TuringError::config(format!(
                    "{:?} '{}' has {} values; a single parameter set is required",
                    kind,
                    name,
                    values.len()
                ))),
            })
            .collect()
    }
}

/// Spacing for [`screen_values`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    #[default]
    Linear,
    Log,
}

/// `number` values between `min` and `max` inclusive, linearly or log-spaced
pub fn screen_values(min: f64, max: f64, number: usize, mode: ScreenMode) -> TuringResult<Vec<f64>> {
    if number == 0 {
        return Err(TuringError::config("screen_values needs number >= 1"));
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(TuringError::config(format!(
            "screen_values needs finite min <= max, got [{}, {}]",
            min, max
        )));
    }
    if number == 1 {
        return Ok(vec![min]);
    }

    let (lo, hi) = match mode {
        ScreenMode::Linear => (min, max),
        ScreenMode::Log => {
            if min <= 0.0 {
                return Err(TuringError::config(format!(
                    "log-spaced screen_values needs min > 0, got {}",
                    min
                )));
            }
            (min.log10(), max.log10())
        }
    };

    let step = (hi - lo) / (number - 1) as f64;
    let values = (0..number)
        .map(|i| {
            let x = if i == number - 1 { hi } else { lo + step * i as f64 };
            match mode {
                ScreenMode::Linear => x,
                ScreenMode::Log => 10f64.powf(x),
            }
        })
        .collect();
    Ok(values)
}
