//! Experiment driver: repeated independent runs and their summary statistics.

use log::info;
use rand::prelude::*;

use crate::schema::{
    ConfigError, ExperimentConfig, ExperimentReport, ExperimentSummary, RunSummary, SearchConfig,
    StopReason, SummaryStats,
};

use super::search::{ConvexSearch, SearchError};

/// Errors from running an experiment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExperimentError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Run {run} failed: {source}")]
    Search {
        run: usize,
        #[source]
        source: SearchError,
    },
}

/// Runs independent convex search trials one after another.
pub struct Experiment {
    config: ExperimentConfig,
    rng: StdRng,
}

impl Experiment {
    /// Create an experiment, validating the configuration up front.
    pub fn new(config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.validate()?;
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run every trial.
    pub fn run(&mut self) -> Result<ExperimentReport, ExperimentError> {
        self.run_with_callback(|_, _| {})
    }

    /// Run every trial, calling `callback` with the 1-based run number and
    /// its summary as each one finishes.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<ExperimentReport, ExperimentError>
    where
        F: FnMut(usize, &RunSummary),
    {
        let mut runs = Vec::with_capacity(self.config.runs);

        for run in 1..=self.config.runs {
            let seed = self.rng.next_u64();
            let config = SearchConfig {
                random_seed: Some(seed),
                ..self.config.search.clone()
            };

            let result = ConvexSearch::new(config)
                .and_then(|mut engine| engine.run())
                .map_err(|source| ExperimentError::Search { run, source })?;

            let summary = RunSummary::from_result(seed, &result);
            info!(
                "run {}/{}: fitness {} after {} generations ({:?})",
                run,
                self.config.runs,
                summary.best_fitness,
                summary.generations,
                summary.stop_reason
            );
            callback(run, &summary);
            runs.push(summary);
        }

        let summary = summarize_runs(&runs);
        Ok(ExperimentReport {
            config: self.config.clone(),
            runs,
            summary,
        })
    }
}

/// Aggregate fitness and generation statistics over a set of runs.
pub fn summarize_runs(runs: &[RunSummary]) -> ExperimentSummary {
    let fitness: Vec<f64> = runs.iter().map(|r| r.best_fitness as f64).collect();
    let generations: Vec<f64> = runs.iter().map(|r| r.generations as f64).collect();

    ExperimentSummary {
        runs: runs.len(),
        converged_runs: runs
            .iter()
            .filter(|r| r.stop_reason == StopReason::Converged)
            .count(),
        fitness: summarize(&fitness),
        generations: summarize(&generations),
    }
}

/// Max, min, mean, median and sample standard deviation of `values`.
///
/// All fields are 0.0 for an empty slice; `stdev` is 0.0 for fewer than two
/// values.
pub fn summarize(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::default();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let stdev = if values.len() < 2 {
        0.0
    } else {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    };

    SummaryStats {
        max: sorted[sorted.len() - 1],
        min: sorted[0],
        mean,
        median,
        stdev,
    }
}
