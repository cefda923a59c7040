//! Quick convergence and throughput survey

use convex_search::{
    ConvexSearch, FitnessFunction, SearchConfig, SearchVariant,
    schema::{GateThreshold, recommended_population_size},
};
use std::time::Instant;

fn main() {
    println!("=== Convergence Survey (LeadingOnes, recommended sizes) ===\n");

    for individual_size in [10, 100, 1000] {
        let population_size = recommended_population_size(individual_size).unwrap_or(25);
        println!(
            "Individual size: {} (population {})",
            individual_size, population_size
        );

        for variant in [SearchVariant::Simple, SearchVariant::Gated] {
            let config = SearchConfig {
                population_size,
                individual_size,
                max_generations: 100,
                fitness_function: FitnessFunction::LeadingOnes,
                search_variant: variant,
                gate_threshold: GateThreshold::PopulationMean,
                random_seed: Some(42),
            };

            let start = Instant::now();
            let mut engine = ConvexSearch::new(config).expect("valid configuration");
            let result = engine.run().expect("search run");
            let elapsed = start.elapsed();

            println!("  Variant:        {}", variant);
            println!("  Generations:    {}", result.generations);
            println!("  Stop reason:    {:?}", result.stop_reason);
            println!("  Fitness:        {}", result.best_fitness);
            println!("  Elapsed:        {:.3}s", elapsed.as_secs_f64());
            println!();
        }
    }

    println!("=== Scalability Test (BitCount, 1000 bits, 20 generations) ===\n");

    for population_size in [10, 20, 40, 80] {
        let config = SearchConfig {
            population_size,
            individual_size: 1000,
            max_generations: 20,
            fitness_function: FitnessFunction::BitCount,
            search_variant: SearchVariant::Simple,
            gate_threshold: GateThreshold::PopulationMean,
            random_seed: Some(42),
        };

        let start = Instant::now();
        let mut engine = ConvexSearch::new(config).expect("valid configuration");
        let result = engine.run().expect("search run");
        let elapsed = start.elapsed();

        let total_evals = (result.generations + 1) * population_size;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!(
            "Population {}: {} evals in {:.3}s ({:.1} evals/sec)",
            population_size,
            total_evals,
            elapsed.as_secs_f64(),
            evals_per_sec
        );
    }
}
