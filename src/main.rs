//! Convex search CLI - Run experiments from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use convex_search::{
    compute::Experiment,
    schema::{ExperimentConfig, SummaryStats, recommended_population_size},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <experiment.json> [runs]", args[0]);
        eprintln!();
        eprintln!("Run convex search trials from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  experiment.json  Path to experiment configuration file");
        eprintln!("  runs             Override the number of runs");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: ExperimentConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(runs) = args.get(2) {
        config.runs = runs.parse().unwrap_or_else(|e| {
            eprintln!("Error parsing run count {:?}: {}", runs, e);
            std::process::exit(1);
        });
    }

    let search = &config.search;
    println!(
        "Max runs: {}, Max gens.: {}, Pop. size: {}, Ind. size: {}",
        config.runs, search.max_generations, search.population_size, search.individual_size
    );
    println!(
        "Fitness: {}, Variant: {}, Gate: {:?}",
        search.fitness_function, search.search_variant, search.gate_threshold
    );
    if let Some(recommended) = recommended_population_size(search.individual_size)
        && recommended != search.population_size
    {
        println!(
            "Note: population size {} is recommended for individual size {}",
            recommended, search.individual_size
        );
    }
    println!();

    let mut experiment = Experiment::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let report = experiment
        .run_with_callback(|run, _| println!("Runs: {}", run))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    let elapsed = start.elapsed();

    println!();
    print_stats("Fitness", &report.summary.fitness);
    print_stats("Generations", &report.summary.generations);
    println!(
        "Converged: {}/{}",
        report.summary.converged_runs, report.summary.runs
    );
    println!(
        "Time: {:.2}s ({:.1} runs/s)",
        elapsed.as_secs_f32(),
        report.summary.runs as f32 / elapsed.as_secs_f32()
    );

    let report_path = config_path.with_extension("results.json");
    match report.save(&report_path) {
        Ok(()) => println!("Report written to {}", report_path.display()),
        Err(e) => {
            eprintln!("Error writing report: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_stats(label: &str, stats: &SummaryStats) {
    println!(
        "{}: Max: {}, Min: {}, Avg: {:.6}, Median: {}, Stdev: {:.6}",
        label, stats.max, stats.min, stats.mean, stats.median, stats.stdev
    );
}

fn print_example_config() {
    let config = ExperimentConfig::default();

    println!("Example configuration (experiment.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}
