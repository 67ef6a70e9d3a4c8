//! Population evaluation: maps the oracle over a generation.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use rayon::prelude::*;

use crate::schema::{Individual, TemplateCatalog};

use super::oracle::Scorer;

/// Attaches fitness to every unscored individual in a population.
///
/// Individuals are evaluated in parallel; each one's fitness depends only on
/// its own genome, so evaluation order does not affect results. Every oracle
/// failure is absorbed as the worst possible score (0.0) so the engine
/// always receives a usable fitness.
pub struct PopulationEvaluator<'a> {
    scorer: &'a dyn Scorer,
    catalog: &'a TemplateCatalog,
}

impl<'a> PopulationEvaluator<'a> {
    /// Create an evaluator over the given scorer and catalog.
    pub fn new(scorer: &'a dyn Scorer, catalog: &'a TemplateCatalog) -> Self {
        Self { scorer, catalog }
    }

    /// Evaluate the population in place. Individuals that already carry a
    /// fitness (carried-over elites) are left untouched, so their score
    /// survives the oracle's non-determinism. Returns the number of oracle
    /// calls issued.
    pub fn evaluate(&self, population: &mut [Individual]) -> u64 {
        let calls = AtomicU64::new(0);

        population.par_iter_mut().for_each(|individual| {
            if individual.fitness.is_some() {
                return;
            }

            let artifact = self.catalog.render(&individual.genome);
            calls.fetch_add(1, Ordering::Relaxed);

            let fitness = match self.scorer.score(&artifact) {
                Ok(evaluation) => {
                    debug!("scored artifact ({} bytes): {}", artifact.len(), evaluation.score);
                    evaluation.score
                }
                Err(e) => {
                    warn!("evaluation failed, assigning worst score: {e}");
                    0.0
                }
            };

            individual.fitness = Some(fitness);
        });

        calls.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::oracle::{Evaluation, OracleError};
    use crate::schema::{ArtifactKind, Slot};

    fn test_catalog() -> TemplateCatalog {
        TemplateCatalog {
            kind: ArtifactKind::CodeSkeleton,
            slots: vec![Slot::new("a", &["x", "y"]), Slot::new("b", &["u", "v"])],
        }
    }

    struct FixedScorer(f32);

    impl Scorer for FixedScorer {
        fn score(&self, _artifact: &str) -> Result<Evaluation, OracleError> {
            Ok(Evaluation {
                score: self.0,
                raw: format!("TOTAL SCORE: {}", self.0),
            })
        }
    }

    struct FailingScorer;

    impl Scorer for FailingScorer {
        fn score(&self, _artifact: &str) -> Result<Evaluation, OracleError> {
            Err(OracleError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn test_evaluate_sets_fitness_on_all() {
        let catalog = test_catalog();
        let scorer = FixedScorer(5.0);
        let evaluator = PopulationEvaluator::new(&scorer, &catalog);

        let mut population = vec![
            Individual::new(vec![0, 0]),
            Individual::new(vec![1, 0]),
            Individual::new(vec![0, 1]),
        ];
        let calls = evaluator.evaluate(&mut population);

        assert_eq!(calls, 3);
        for individual in &population {
            assert_eq!(individual.fitness, Some(5.0));
        }
    }

    #[test]
    fn test_failures_score_as_worst() {
        let catalog = test_catalog();
        let scorer = FailingScorer;
        let evaluator = PopulationEvaluator::new(&scorer, &catalog);

        let mut population = vec![Individual::new(vec![0, 0])];
        evaluator.evaluate(&mut population);

        assert_eq!(population[0].fitness, Some(0.0));
    }

    #[test]
    fn test_already_scored_individuals_are_skipped() {
        let catalog = test_catalog();
        let scorer = FixedScorer(2.0);
        let evaluator = PopulationEvaluator::new(&scorer, &catalog);

        let elite = Individual {
            genome: vec![1, 1],
            fitness: Some(9.0),
        };
        let mut population = vec![elite, Individual::new(vec![0, 0])];
        let calls = evaluator.evaluate(&mut population);

        assert_eq!(calls, 1);
        assert_eq!(population[0].fitness, Some(9.0));
        assert_eq!(population[1].fitness, Some(2.0));
    }
}
