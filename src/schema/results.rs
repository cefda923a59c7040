//! Result, progress and report types produced by search runs and experiments.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExperimentConfig;

/// Outcome of a single convex search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Fitness of the first individual of the final population. Every
    /// individual shares it when the run converged.
    pub best_fitness: usize,
    /// Highest fitness in the final population.
    pub max_fitness: usize,
    /// Generations performed.
    pub generations: usize,
    /// Why the run terminated.
    pub stop_reason: StopReason,
    /// Per-generation statistics.
    pub history: SearchHistory,
}

impl RunResult {
    /// Whether the final population collapsed to one repeated individual.
    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::Converged
    }
}

/// Reason a run stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Every individual in the population is identical.
    Converged,
    /// Reached the generation cap.
    MaxGenerations,
}

/// Per-generation history. Index 0 describes the initial population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<usize>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Population standard deviation of fitness per generation.
    pub fitness_std: Vec<f64>,
    /// Number of distinct individuals per generation.
    pub distinct_individuals: Vec<usize>,
    /// Mating pool size used to produce each generation after the first.
    pub mating_pool_size: Vec<usize>,
}

/// Snapshot handed to progress callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Current generation.
    pub generation: usize,
    /// Generation cap.
    pub max_generations: usize,
    /// Best fitness in the current population.
    pub best_fitness: usize,
    /// Mean fitness of the current population.
    pub avg_fitness: f64,
    /// Number of distinct individuals in the current population.
    pub distinct_individuals: usize,
    /// Size of the mating pool that produced this generation, if any.
    pub mating_pool_size: Option<usize>,
}

/// Compact per-trial record kept by the experiment driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Seed the trial was run with.
    pub seed: u64,
    pub best_fitness: usize,
    pub max_fitness: usize,
    pub generations: usize,
    pub stop_reason: StopReason,
}

impl RunSummary {
    pub fn from_result(seed: u64, result: &RunResult) -> Self {
        Self {
            seed,
            best_fitness: result.best_fitness,
            max_fitness: result.max_fitness,
            generations: result.generations,
            stop_reason: result.stop_reason,
        }
    }
}

/// Descriptive statistics over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SummaryStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub stdev: f64,
}

/// Aggregate statistics over all trials of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Number of trials.
    pub runs: usize,
    /// Trials that ended with a converged population.
    pub converged_runs: usize,
    /// Statistics of the returned fitness.
    pub fitness: SummaryStats,
    /// Statistics of the generation counts.
    pub generations: SummaryStats,
}

/// Serializable record of a whole experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    pub runs: Vec<RunSummary>,
    pub summary: ExperimentSummary,
}

impl ExperimentReport {
    /// Save the report as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Load a report previously written by [`ExperimentReport::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
