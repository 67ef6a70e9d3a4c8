//! The evolution engine: generation loop, selection, crossover, elitism.

use std::time::Instant;

use log::info;

use crate::schema::{
    EvolutionConfig, EvolutionHistory, EvolutionProgress, EvolutionResult, EvolutionStats,
    Individual, TemplateCatalog,
};

use super::evaluate::PopulationEvaluator;
use super::genome::GenomeRng;
use super::oracle::Scorer;

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(&EvolutionProgress) + Send + Sync>;

/// Drives the genetic algorithm against an injected fitness scorer.
///
/// The engine owns the population's lifetime: each generation is rebuilt
/// from the previous one (elites plus crossover/mutation offspring) and the
/// old generation is discarded. All randomness flows through one seeded
/// [`GenomeRng`], so a fixed `random_seed` makes runs reproducible.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    catalog: TemplateCatalog,
    scorer: Box<dyn Scorer>,
    rng: GenomeRng,
    population: Vec<Individual>,
    generation: usize,
    best: Option<Individual>,
    history: EvolutionHistory,
    total_evaluations: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine.
    ///
    /// The configuration and catalog are assumed valid; callers go through
    /// `validate()` first.
    pub fn new(config: EvolutionConfig, catalog: TemplateCatalog, scorer: Box<dyn Scorer>) -> Self {
        let rng = match config.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };

        Self {
            config,
            catalog,
            scorer,
            rng,
            population: Vec::new(),
            generation: 0,
            best: None,
            history: EvolutionHistory::default(),
            total_evaluations: 0,
        }
    }

    /// Build the initial population of random, unevaluated individuals.
    /// Duplicates are permitted.
    fn initialize(&mut self) {
        self.population = (0..self.config.population_size)
            .map(|_| self.rng.random_individual(&self.catalog))
            .collect();
        self.generation = 1;
        self.best = None;
        self.history = EvolutionHistory::default();
        self.total_evaluations = 0;
    }

    /// Score every unevaluated individual in the current population.
    fn evaluate_population(&mut self) {
        let evaluator = PopulationEvaluator::new(self.scorer.as_ref(), &self.catalog);
        let calls = evaluator.evaluate(&mut self.population);
        self.total_evaluations += calls;
    }

    /// Best individual of the current population, first-found on ties.
    fn generation_best(&self) -> Option<&Individual> {
        self.population
            .iter()
            .reduce(|best, ind| if ind.score() > best.score() { ind } else { best })
    }

    /// Mean fitness of the current population.
    fn generation_avg(&self) -> f32 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().map(|i| i.score()).sum::<f32>() / self.population.len() as f32
    }

    /// Record history and the best-ever individual for this generation.
    fn record_generation(&mut self) {
        let Some(gen_best) = self.generation_best().cloned() else {
            return;
        };
        let avg = self.generation_avg();

        self.history.best_fitness.push(gen_best.score());
        self.history.avg_fitness.push(avg);

        info!(
            "generation {}/{}: best={:.2}, avg={:.2}",
            self.generation, self.config.max_generations, gen_best.score(), avg
        );

        let improved = self
            .best
            .as_ref()
            .is_none_or(|best| gen_best.score() > best.score());
        if improved {
            self.best = Some(gen_best);
        }
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> EvolutionProgress {
        let gen_best = self.generation_best();

        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.max_generations,
            population_size: self.population.len(),
            generation_best: gen_best.map(Individual::score).unwrap_or(0.0),
            best_fitness: self.best.as_ref().map(Individual::score).unwrap_or(0.0),
            avg_fitness: self.generation_avg(),
            best_artifact: gen_best
                .map(|ind| self.catalog.render(&ind.genome))
                .unwrap_or_default(),
            history: self.history.clone(),
        }
    }

    /// Tournament selection: sample `tournament_size` distinct individuals
    /// and return the index of the fittest, first-found on ties.
    fn tournament(&mut self) -> usize {
        let contenders = self
            .rng
            .sample_indices(self.population.len(), self.config.tournament_size);

        contenders
            .into_iter()
            .reduce(|best, idx| {
                if self.population[idx].score() > self.population[best].score() {
                    idx
                } else {
                    best
                }
            })
            .expect("tournament sample is never empty")
    }

    /// Produce the next generation: elites carried unchanged, the remainder
    /// filled with tournament-selected, crossed-over, mutated children.
    ///
    /// Mutation only ever touches freshly produced children; elites are
    /// exempt and keep their recorded fitness.
    fn reproduce(&mut self) {
        self.population
            .sort_by(|a, b| b.score().total_cmp(&a.score()));

        let elite_count = self.config.elite_size.min(self.population.len());
        let mut next_gen: Vec<Individual> = Vec::with_capacity(self.config.population_size);
        next_gen.extend(self.population[..elite_count].iter().cloned());

        while next_gen.len() < self.config.population_size {
            let parent1 = self.tournament();
            let parent2 = self.tournament();

            let mut child_genome = self.rng.crossover(
                &self.population[parent1].genome,
                &self.population[parent2].genome,
            );
            self.rng
                .mutate(&mut child_genome, self.config.mutation_rate, &self.catalog);

            next_gen.push(Individual::new(child_genome));
        }

        self.population = next_gen;
    }

    /// Run evolution with a per-generation progress callback.
    ///
    /// Performs exactly `max_generations` evaluation rounds and returns the
    /// best-ever individual.
    pub fn run_with_callback<F>(&mut self, callback: F) -> EvolutionResult
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = Instant::now();

        self.initialize();

        loop {
            self.evaluate_population();
            self.record_generation();
            callback(&self.progress());

            if self.generation >= self.config.max_generations {
                break;
            }

            self.reproduce();
            self.generation += 1;
        }

        let best = self
            .best
            .clone()
            .expect("a completed run always has a best individual");
        let best_artifact = self.catalog.render(&best.genome);

        EvolutionResult {
            best_artifact,
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations: self.total_evaluations,
                best_fitness: best.score(),
                final_avg_fitness: self.generation_avg(),
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            },
            history: self.history.clone(),
            best,
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}
