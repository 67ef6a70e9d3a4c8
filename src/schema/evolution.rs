//! Evolution configuration, individuals, and run reporting types.

use serde::{Deserialize, Serialize};

use super::{Genome, OracleConfig, TemplateCatalog};

/// One candidate solution: a genome plus an optional fitness.
///
/// Fitness is absent until the individual has been evaluated by the oracle.
/// Individuals are value objects; the engine rebuilds the population every
/// generation rather than mutating it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    /// One chosen alternative index per catalog slot.
    pub genome: Genome,
    /// Oracle score; higher is better. `None` until evaluated.
    pub fitness: Option<f32>,
}

impl Individual {
    /// Create an unevaluated individual.
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Fitness for ranking purposes. Unevaluated individuals rank as the
    /// worst possible score, matching the oracle failure convention.
    #[inline]
    pub fn score(&self) -> f32 {
        self.fitness.unwrap_or(0.0)
    }
}

/// Run parameters for the genetic algorithm. Read-only for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of individuals per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of evaluation rounds before the run terminates.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Per-gene mutation probability (0.0-1.0), applied to children only.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Number of best individuals carried forward unchanged.
    #[serde(default = "default_elite_size")]
    pub elite_size: usize,
    /// Number of individuals sampled (without replacement) per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            max_generations: default_max_generations(),
            mutation_rate: default_mutation_rate(),
            elite_size: default_elite_size(),
            tournament_size: default_tournament_size(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    20
}
fn default_max_generations() -> usize {
    10
}
fn default_mutation_rate() -> f32 {
    0.1
}
fn default_elite_size() -> usize {
    2
}
fn default_tournament_size() -> usize {
    3
}

impl EvolutionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        if self.population_size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if self.max_generations == 0 {
            return Err(EvolutionConfigError::NoGenerations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolutionConfigError::InvalidMutationRate(
                self.mutation_rate,
            ));
        }
        if self.elite_size > self.population_size {
            return Err(EvolutionConfigError::EliteSizeTooLarge {
                elite: self.elite_size,
                population: self.population_size,
            });
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(EvolutionConfigError::InvalidTournamentSize {
                tournament: self.tournament_size,
                population: self.population_size,
            });
        }
        Ok(())
    }
}

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Max generations must be non-zero")]
    NoGenerations,
    #[error("Mutation rate must be in [0, 1], got {0}")]
    InvalidMutationRate(f32),
    #[error("Elite size {elite} exceeds population size {population}")]
    EliteSizeTooLarge { elite: usize, population: usize },
    #[error("Tournament size {tournament} must be in [1, {population}]")]
    InvalidTournamentSize {
        tournament: usize,
        population: usize,
    },
}

/// Per-generation fitness traces accumulated over a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    /// Best fitness of each generation.
    pub best_fitness: Vec<f32>,
    /// Mean fitness of each generation.
    pub avg_fitness: Vec<f32>,
}

/// Progress snapshot reported after each evaluation round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Current generation index (starts at 1).
    pub generation: usize,
    /// Configured generation budget.
    pub total_generations: usize,
    /// Size of the current population.
    pub population_size: usize,
    /// Best fitness within the current generation.
    pub generation_best: f32,
    /// Best fitness observed so far across all generations.
    pub best_fitness: f32,
    /// Mean fitness of the current generation.
    pub avg_fitness: f32,
    /// Rendered artifact of the current generation's best individual.
    pub best_artifact: String,
    /// Fitness traces up to and including this generation.
    pub history: EvolutionHistory,
}

/// Summary statistics for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Number of evaluation rounds performed.
    pub generations: usize,
    /// Total oracle evaluations issued (elites are not re-scored).
    pub total_evaluations: u64,
    /// Best fitness observed across the whole run.
    pub best_fitness: f32,
    /// Mean fitness of the final generation.
    pub final_avg_fitness: f32,
    /// Wall-clock run time.
    pub elapsed_seconds: f64,
}

/// Everything a run needs: algorithm parameters, oracle settings, and the
/// search space. Loadable from JSON by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Genetic algorithm parameters.
    #[serde(default)]
    pub evolution: EvolutionConfig,
    /// Scoring service settings.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// The template catalog to search over.
    pub catalog: TemplateCatalog,
}

impl RunConfig {
    /// Validate all parts of the run configuration.
    pub fn validate(&self) -> Result<(), RunConfigError> {
        self.evolution.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

/// Run configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error(transparent)]
    Evolution(#[from] EvolutionConfigError),
    #[error(transparent)]
    Catalog(#[from] super::CatalogError),
}

/// Final outcome of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best-ever individual, fitness attached.
    pub best: Individual,
    /// The best individual's rendered artifact.
    pub best_artifact: String,
    /// Run statistics.
    pub stats: EvolutionStats,
    /// Per-generation fitness traces.
    pub history: EvolutionHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::EmptyPopulation)
        ));

        config.population_size = 4;
        config.max_generations = 0;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::NoGenerations)
        ));

        config.max_generations = 2;
        config.mutation_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidMutationRate(_))
        ));

        config.mutation_rate = 0.1;
        config.elite_size = 5;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::EliteSizeTooLarge { .. })
        ));

        config.elite_size = 1;
        config.tournament_size = 9;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::InvalidTournamentSize { .. })
        ));

        config.tournament_size = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unevaluated_individual_ranks_worst() {
        let individual = Individual::new(vec![0, 1]);
        assert!(individual.fitness.is_none());
        assert_eq!(individual.score(), 0.0);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: EvolutionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.tournament_size, 3);
        assert!(config.random_seed.is_none());
    }
}
