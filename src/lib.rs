//! Oracle Evolve - Evolutionary search scored by an LLM oracle.
//!
//! This crate runs a genetic algorithm over a discrete space of
//! template-composed artifacts (program skeletons or prompt skeletons).
//! Fitness is not computed locally: each candidate is rendered to text and
//! scored by an external generative-model service, which returns free-form
//! prose that the oracle client mines for a numeric verdict.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: catalog, configuration, and reporting types
//! - `engine`: genome operations, oracle client, evaluator, search loop
//!
//! # Example
//!
//! ```rust,no_run
//! use oracle_evolve::{
//!     engine::{EvolutionEngine, OllamaScorer},
//!     schema::{EvolutionConfig, OracleConfig, TemplateCatalog},
//! };
//!
//! let catalog = TemplateCatalog::python_function_demo();
//! let scorer = OllamaScorer::new(OracleConfig::default()).unwrap();
//! let config = EvolutionConfig {
//!     population_size: 8,
//!     max_generations: 5,
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, catalog, Box::new(scorer));
//! let result = engine.run();
//!
//! println!("best fitness: {:.2}", result.stats.best_fitness);
//! println!("{}", result.best_artifact);
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{EvolutionEngine, OllamaScorer, Scorer};
pub use schema::{EvolutionConfig, EvolutionResult, Individual, RunConfig, TemplateCatalog};
