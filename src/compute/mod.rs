//! Compute module - The convex search algorithm and its experiment driver.
//!
//! # Overview
//!
//! - **Individuals** (`individual`): bit vectors, populations and the seeded
//!   random source
//! - **Fitness** (`fitness`): BitCount and LeadingOnes evaluators
//! - **Selection** (`selection`): mating pool policies
//! - **Recombination** (`recombination`): column-consensus offspring synthesis
//! - **Search** (`search`): the generational loop
//! - **Experiment** (`experiment`): repeated trials and summary statistics
//!
//! Within a generation, initial sampling, evaluation and offspring synthesis
//! run on the rayon thread pool. Generations and trials run sequentially.

mod experiment;
mod fitness;
mod individual;
mod recombination;
mod search;
mod selection;

pub use experiment::{Experiment, ExperimentError, summarize, summarize_runs};
pub use fitness::{FitnessVector, evaluate_population};
pub use individual::{
    BitRng, Individual, Population, PopulationError, create_individual, create_population,
};
pub use recombination::{RecombinationError, recombine_individual, recombine_population};
pub use search::{ConvexSearch, SearchError, run_search, run_search_with_rng};
pub use selection::{
    MatingPool, PoolStrategy, SelectionError, SelectionPolicy, any_two_greater_than,
    select_above_avg, select_at_least, select_better_than_worst,
};
