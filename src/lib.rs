//! Convex search - population-based consensus recombination.
//!
//! This crate implements convex search, a stochastic search heuristic used to
//! study optimisation dynamics on pseudo-Boolean benchmarks (BitCount and
//! LeadingOnes). Each generation selects a mating pool, then builds a new
//! population whose bits copy the pool wherever it is unanimous and are drawn
//! uniformly at random elsewhere. A run ends when the population collapses to
//! a single repeated individual or the generation cap is reached.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, result and report types
//! - `compute`: Population model, fitness, selection, recombination, search
//!   loop and experiment driver
//!
//! # Example
//!
//! ```rust,no_run
//! use convex_search::{
//!     compute::ConvexSearch,
//!     schema::{FitnessFunction, SearchConfig, SearchVariant},
//! };
//!
//! let config = SearchConfig {
//!     population_size: 40,
//!     individual_size: 100,
//!     fitness_function: FitnessFunction::LeadingOnes,
//!     search_variant: SearchVariant::Gated,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut engine = ConvexSearch::new(config).expect("valid configuration");
//! let result = engine.run().expect("search run");
//!
//! println!(
//!     "fitness {} after {} generations",
//!     result.best_fitness, result.generations
//! );
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{ConvexSearch, Experiment, SearchError, run_search};
pub use schema::{ExperimentConfig, FitnessFunction, RunResult, SearchConfig, SearchVariant};
