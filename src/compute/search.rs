//! The convex search loop.

use log::{debug, info, warn};

use crate::schema::{
    ConfigError, RunResult, SearchConfig, SearchHistory, SearchProgress, StopReason,
};

use super::fitness::{FitnessVector, evaluate_population};
use super::individual::{BitRng, Population, create_population};
use super::recombination::{RecombinationError, recombine_population};
use super::selection::{SelectionError, SelectionPolicy};

/// Errors that stop a search run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Recombination(#[from] RecombinationError),
    #[error(
        "Initial population is {found_size}x{found_length}, configuration expects {expected_size}x{expected_length}"
    )]
    PopulationShape {
        expected_size: usize,
        expected_length: usize,
        found_size: usize,
        found_length: usize,
    },
}

/// Engine that drives generations until the population converges or the
/// generation cap is hit.
///
/// The engine owns its random source; running it twice continues the same
/// random stream rather than replaying it.
pub struct ConvexSearch {
    config: SearchConfig,
    rng: BitRng,
    policy: SelectionPolicy,
}

impl ConvexSearch {
    /// Create an engine seeded from `config.random_seed`, or from entropy
    /// when no seed is set.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let rng = match config.random_seed {
            Some(seed) => BitRng::new(seed),
            None => BitRng::random(),
        };
        Self::with_rng(config, rng)
    }

    /// Create an engine with an explicit random source.
    pub fn with_rng(config: SearchConfig, rng: BitRng) -> Result<Self, SearchError> {
        config.validate()?;
        let policy = SelectionPolicy::from_config(&config);
        Ok(Self {
            config,
            rng,
            policy,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run from a fresh random population.
    pub fn run(&mut self) -> Result<RunResult, SearchError> {
        self.run_with_callback(|_| {})
    }

    /// Run from a fresh random population, reporting progress after
    /// initialisation and after every generation.
    pub fn run_with_callback<F>(&mut self, callback: F) -> Result<RunResult, SearchError>
    where
        F: FnMut(&SearchProgress),
    {
        let population = create_population(
            self.config.population_size,
            self.config.individual_size,
            &mut self.rng,
        );
        self.evolve(population, callback)
    }

    /// Run from a given initial population.
    pub fn run_from(&mut self, population: Population) -> Result<RunResult, SearchError> {
        if population.len() != self.config.population_size
            || population.individual_size() != self.config.individual_size
        {
            return Err(SearchError::PopulationShape {
                expected_size: self.config.population_size,
                expected_length: self.config.individual_size,
                found_size: population.len(),
                found_length: population.individual_size(),
            });
        }
        self.evolve(population, |_| {})
    }

    fn evolve<F>(
        &mut self,
        mut population: Population,
        mut callback: F,
    ) -> Result<RunResult, SearchError>
    where
        F: FnMut(&SearchProgress),
    {
        let fitness_function = self.config.fitness_function;
        let max_generations = self.config.max_generations;

        let mut fitness = evaluate_population(&population, fitness_function);
        let mut generation = 0;
        let mut history = SearchHistory::default();

        record(&mut history, &population, &fitness, None);
        callback(&progress(generation, max_generations, &population, &fitness, None));

        let stop_reason = loop {
            if population.is_uniform() {
                break StopReason::Converged;
            }
            if generation >= max_generations {
                break StopReason::MaxGenerations;
            }

            let pool = self.policy.mating_pool(&population, &fitness)?;
            let pool_size = pool.len();
            debug!(
                "generation {}: {:?} pool of {} (best {}, mean {:.3})",
                generation,
                pool.strategy(),
                pool_size,
                fitness.max().unwrap_or(0),
                fitness.mean()
            );

            let offspring =
                recombine_population(&pool, self.config.population_size, &mut self.rng)?;
            population = offspring;
            fitness = evaluate_population(&population, fitness_function);
            generation += 1;

            record(&mut history, &population, &fitness, Some(pool_size));
            callback(&progress(
                generation,
                max_generations,
                &population,
                &fitness,
                Some(pool_size),
            ));
        };

        let best_fitness = fitness.get(0).unwrap_or(0);
        let max_fitness = fitness.max().unwrap_or(0);

        match stop_reason {
            StopReason::Converged => info!(
                "converged after {} generations with fitness {}",
                generation, best_fitness
            ),
            StopReason::MaxGenerations => warn!(
                "generation cap {} reached without convergence (first {}, best {}, {} distinct)",
                max_generations,
                best_fitness,
                max_fitness,
                population.distinct_count()
            ),
        }

        Ok(RunResult {
            best_fitness,
            max_fitness,
            generations: generation,
            stop_reason,
            history,
        })
    }
}

fn record(
    history: &mut SearchHistory,
    population: &Population,
    fitness: &FitnessVector,
    pool_size: Option<usize>,
) {
    history.best_fitness.push(fitness.max().unwrap_or(0));
    history.avg_fitness.push(fitness.mean());
    history.fitness_std.push(fitness.std_dev());
    history.distinct_individuals.push(population.distinct_count());
    if let Some(size) = pool_size {
        history.mating_pool_size.push(size);
    }
}

fn progress(
    generation: usize,
    max_generations: usize,
    population: &Population,
    fitness: &FitnessVector,
    mating_pool_size: Option<usize>,
) -> SearchProgress {
    SearchProgress {
        generation,
        max_generations,
        best_fitness: fitness.max().unwrap_or(0),
        avg_fitness: fitness.mean(),
        distinct_individuals: population.distinct_count(),
        mating_pool_size,
    }
}

/// Run one convex search with the configured seed (or entropy).
pub fn run_search(config: &SearchConfig) -> Result<RunResult, SearchError> {
    ConvexSearch::new(config.clone())?.run()
}

/// Run one convex search drawing all randomness from `rng`.
pub fn run_search_with_rng(config: &SearchConfig, rng: BitRng) -> Result<RunResult, SearchError> {
    ConvexSearch::with_rng(config.clone(), rng)?.run()
}
