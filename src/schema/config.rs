//! Search and experiment configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Configuration for a single convex search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of bits per individual.
    pub individual_size: usize,
    /// Generation cap.
    pub max_generations: usize,
    /// Benchmark landscape to optimise.
    pub fitness_function: FitnessFunction,
    /// Mating pool policy.
    pub search_variant: SearchVariant,
    /// Threshold used by the gated policy.
    #[serde(default)]
    pub gate_threshold: GateThreshold,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 25,
            individual_size: 1000,
            max_generations: 100,
            fitness_function: FitnessFunction::LeadingOnes,
            search_variant: SearchVariant::Gated,
            gate_threshold: GateThreshold::default(),
            random_seed: None,
        }
    }
}

impl SearchConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.individual_size == 0 {
            return Err(ConfigError::InvalidIndividualSize);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::InvalidMaxGenerations);
        }
        Ok(())
    }
}

/// Configuration for a batch of independent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Per-run search settings. Its `random_seed` is ignored; each trial
    /// receives a seed derived from the experiment seed.
    pub search: SearchConfig,
    /// Number of independent trials.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Master seed for the whole experiment.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            runs: default_runs(),
            random_seed: None,
        }
    }
}

fn default_runs() -> usize {
    500
}

impl ExperimentConfig {
    /// Validate the experiment and its search settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        if self.runs == 0 {
            return Err(ConfigError::InvalidRuns);
        }
        Ok(())
    }
}

/// Benchmark fitness landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FitnessFunction {
    /// Number of 1-bits (OneMax).
    BitCount,
    /// Length of the initial run of 1-bits.
    LeadingOnes,
}

impl FromStr for FitnessFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_selector(s).as_str() {
            "bitcount" | "onemax" => Ok(Self::BitCount),
            "leadingones" | "leadingonesprefix" => Ok(Self::LeadingOnes),
            _ => Err(ConfigError::UnknownFitnessFunction(s.to_string())),
        }
    }
}

impl fmt::Display for FitnessFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BitCount => write!(f, "bitcount"),
            Self::LeadingOnes => write!(f, "leading_ones"),
        }
    }
}

impl<'de> Deserialize<'de> for FitnessFunction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Mating pool policy applied when the fitness vector is not uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SearchVariant {
    /// Always keep everything strictly better than the worst.
    Simple,
    /// Keep everything at or above the gate threshold when at least three
    /// distinct scores reach it, otherwise fall back to `Simple`.
    Gated,
}

impl FromStr for SearchVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_selector(s).as_str() {
            "simple" => Ok(Self::Simple),
            "gated" => Ok(Self::Gated),
            _ => Err(ConfigError::UnknownSearchVariant(s.to_string())),
        }
    }
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Gated => write!(f, "gated"),
        }
    }
}

impl<'de> Deserialize<'de> for SearchVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Where the gated policy takes its threshold from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GateThreshold {
    /// Arithmetic mean of the current fitness vector.
    #[default]
    PopulationMean,
    /// Closed-form expected fitness of a uniform random individual.
    ExpectedValue,
}

/// Lowercase and drop separators so `leading-ones`, `leading_ones` and
/// `LeadingOnes` all name the same selector.
fn normalize_selector(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Population size recommended for LeadingOnes to be optimised in
/// O(n log n), for the tabulated individual sizes.
pub fn recommended_population_size(individual_size: usize) -> Option<usize> {
    match individual_size {
        10 => Some(25),
        100 => Some(40),
        1000 => Some(60),
        10000 => Some(75),
        _ => None,
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    InvalidPopulationSize,
    #[error("Individual size must be non-zero")]
    InvalidIndividualSize,
    #[error("Maximum generations must be non-zero")]
    InvalidMaxGenerations,
    #[error("Run count must be non-zero")]
    InvalidRuns,
    #[error("Unknown fitness function: {0}")]
    UnknownFitnessFunction(String),
    #[error("Unknown search variant: {0}")]
    UnknownSearchVariant(String),
}
