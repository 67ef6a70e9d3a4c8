//! Evolutionary search engine over template-composed artifacts.
//!
//! The engine consists of:
//!
//! - **Genome Operations** (`genome`): seeded random generation,
//!   single-point crossover, and per-gene mutation
//! - **Fitness Oracle** (`oracle`): the [`Scorer`] capability and the
//!   Ollama-backed HTTP client with score extraction
//! - **Population Evaluation** (`evaluate`): parallel scoring of a
//!   generation with failure absorption
//! - **Search** (`search`): the generation loop tying selection, crossover,
//!   mutation, and elitism together
//!
//! # Example
//!
//! ```rust,no_run
//! use oracle_evolve::engine::{EvolutionEngine, OllamaScorer};
//! use oracle_evolve::schema::{EvolutionConfig, OracleConfig, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::python_function_demo();
//! let scorer = OllamaScorer::new(OracleConfig::default()).unwrap();
//!
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), catalog, Box::new(scorer));
//! let result = engine.run_with_callback(|progress| {
//!     println!("generation {}: best fitness = {:.2}",
//!         progress.generation, progress.generation_best);
//! });
//!
//! println!("best artifact:\n{}", result.best_artifact);
//! ```

mod evaluate;
mod genome;
mod oracle;
mod search;

pub use evaluate::PopulationEvaluator;
pub use genome::GenomeRng;
pub use oracle::{Evaluation, OllamaScorer, OracleError, Scorer, build_eval_prompt, extract_score};
pub use search::{EvolutionEngine, ProgressCallback};
