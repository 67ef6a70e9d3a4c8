//! Genome operations for evolutionary search.
//!
//! Provides random generation, single-point crossover, and per-gene mutation
//! over catalog index genomes. Every random draw in the crate goes through
//! [`GenomeRng`] so runs are reproducible from a single seed.

use rand::prelude::*;

use crate::schema::{Genome, Individual, TemplateCatalog};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate a random genome: one uniform independent draw per slot.
    pub fn random_genome(&mut self, catalog: &TemplateCatalog) -> Genome {
        catalog
            .slots
            .iter()
            .map(|slot| self.rng.gen_range(0..slot.alternatives.len()))
            .collect()
    }

    /// Generate a random unevaluated individual.
    pub fn random_individual(&mut self, catalog: &TemplateCatalog) -> Individual {
        Individual::new(self.random_genome(catalog))
    }

    /// Single-point crossover.
    ///
    /// Picks one cut point `p` in `[1, genome_len]`, shared across both
    /// parents; the child takes parent1's genes before `p` and parent2's
    /// genes from `p` onward. `p == genome_len` reproduces parent1 whole.
    pub fn crossover(&mut self, parent1: &[usize], parent2: &[usize]) -> Genome {
        debug_assert_eq!(parent1.len(), parent2.len());
        let cut = self.rng.gen_range(1..=parent1.len());

        let mut child = Genome::with_capacity(parent1.len());
        child.extend_from_slice(&parent1[..cut]);
        child.extend_from_slice(&parent2[cut..]);
        child
    }

    /// Per-gene mutation.
    ///
    /// Each gene is independently redrawn from its slot's alternatives with
    /// probability `rate`. A redraw may land on the existing value. Returns
    /// whether any gene was redrawn, so the caller can unset fitness.
    pub fn mutate(&mut self, genome: &mut Genome, rate: f32, catalog: &TemplateCatalog) -> bool {
        let mut mutated = false;
        for (gene, slot) in genome.iter_mut().zip(&catalog.slots) {
            if self.rng.r#gen::<f32>() < rate {
                *gene = self.rng.gen_range(0..slot.alternatives.len());
                mutated = true;
            }
        }
        mutated
    }

    /// Sample `amount` distinct indices from `0..len`, uniformly without
    /// replacement. Used for tournament selection.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, len, amount).into_vec()
    }
}
