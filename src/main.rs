//! Oracle Evolve CLI - Run evolutionary search from JSON configuration.

use std::fs;
use std::path::PathBuf;

use oracle_evolve::{
    engine::{EvolutionEngine, OllamaScorer},
    schema::{RunConfig, TemplateCatalog},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json>", args[0]);
        eprintln!();
        eprintln!("Run evolutionary search against an LLM scoring oracle.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to run configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: RunConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let scorer = OllamaScorer::new(config.oracle.clone()).unwrap_or_else(|e| {
        eprintln!("Error creating oracle client: {}", e);
        std::process::exit(1);
    });

    println!("Oracle Evolve");
    println!("=============");
    println!("Oracle: {} ({})", config.oracle.base_url, config.oracle.model);
    println!(
        "Population: {}, generations: {}, mutation rate: {}",
        config.evolution.population_size,
        config.evolution.max_generations,
        config.evolution.mutation_rate
    );
    println!("Catalog: {} slots ({:?})", config.catalog.genome_len(), config.catalog.kind);
    println!();

    let mut engine = EvolutionEngine::new(config.evolution, config.catalog, Box::new(scorer));

    let result = engine.run_with_callback(|progress| {
        println!(
            "Generation {}/{}: best={:.2} (ever {:.2}), avg={:.2}",
            progress.generation,
            progress.total_generations,
            progress.generation_best,
            progress.best_fitness,
            progress.avg_fitness
        );
        println!("Best artifact this generation:");
        println!("{}", progress.best_artifact);
        println!();
    });

    println!("Run complete");
    println!(
        "  Generations: {} ({} oracle evaluations, {:.1}s)",
        result.stats.generations, result.stats.total_evaluations, result.stats.elapsed_seconds
    );
    println!("  Best fitness: {:.2}", result.stats.best_fitness);
    println!();
    println!("Best artifact:");
    println!("{}", result.best_artifact);
}

fn print_example_config() {
    let config = RunConfig {
        evolution: Default::default(),
        oracle: Default::default(),
        catalog: TemplateCatalog::python_function_demo(),
    };

    println!("Example configuration (run.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
