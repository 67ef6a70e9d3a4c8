//! Template catalog types: the discrete search space for evolution.

use serde::{Deserialize, Serialize};

/// A genome is one chosen alternative per catalog slot, stored as an index
/// into that slot's alternative list.
pub type Genome = Vec<usize>;

/// Kind of artifact the catalog assembles. Determines the separator used
/// when joining slot values into the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArtifactKind {
    /// Program skeleton; slots are lines of code, joined by newlines.
    #[default]
    CodeSkeleton,
    /// Prose prompt skeleton; slots are phrases, joined by spaces.
    PromptSkeleton,
}

impl ArtifactKind {
    /// Separator placed between consecutive slot values.
    pub fn separator(&self) -> &'static str {
        match self {
            ArtifactKind::CodeSkeleton => "\n",
            ArtifactKind::PromptSkeleton => " ",
        }
    }
}

/// One position in the template: a fixed menu of interchangeable values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Human-readable slot label (shown in logs, never rendered).
    pub name: String,
    /// The interchangeable textual alternatives for this slot.
    pub alternatives: Vec<String>,
}

impl Slot {
    /// Create a slot from string literals.
    pub fn new(name: &str, alternatives: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered sequence of slots defining the search space. Immutable for the
/// duration of a run; slot count equals genome length for every individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    /// Artifact kind, selects the join convention.
    pub kind: ArtifactKind,
    /// The slots, in render order.
    pub slots: Vec<Slot>,
}

impl TemplateCatalog {
    /// Genome length for individuals drawn from this catalog.
    #[inline]
    pub fn genome_len(&self) -> usize {
        self.slots.len()
    }

    /// Check that every gene indexes into its slot's alternatives.
    pub fn is_valid_genome(&self, genome: &[usize]) -> bool {
        genome.len() == self.slots.len()
            && genome
                .iter()
                .zip(&self.slots)
                .all(|(&gene, slot)| gene < slot.alternatives.len())
    }

    /// Assemble a genome into the final artifact text.
    ///
    /// Pure and deterministic: slot values joined in catalog order by the
    /// kind's separator. The genome must come from this catalog.
    pub fn render(&self, genome: &[usize]) -> String {
        let parts: Vec<&str> = genome
            .iter()
            .zip(&self.slots)
            .map(|(&gene, slot)| slot.alternatives[gene].as_str())
            .collect();
        parts.join(self.kind.separator())
    }

    /// Validate catalog structure.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.slots.is_empty() {
            return Err(CatalogError::NoSlots);
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.alternatives.is_empty() {
                return Err(CatalogError::EmptySlot { slot: i });
            }
        }
        Ok(())
    }

    /// Preset catalog: a small Python function skeleton, one slot per line.
    ///
    /// Mirrors the code-evolution variant: the evolved artifact is a
    /// complete function whose body lines are drawn from fixed fragments.
    pub fn python_function_demo() -> Self {
        Self {
            kind: ArtifactKind::CodeSkeleton,
            slots: vec![
                Slot::new(
                    "signature",
                    &[
                        "def process(items):",
                        "def process(items=None):",
                        "def process(items, verbose=False):",
                    ],
                ),
                Slot::new(
                    "guard",
                    &[
                        "    if not items:\n        return []",
                        "    if items is None:\n        items = []",
                        "    items = items or []",
                    ],
                ),
                Slot::new(
                    "body",
                    &[
                        "    result = [x * 2 for x in items]",
                        "    result = list(map(lambda x: x * 2, items))",
                        "    result = []\n    for x in items:\n        result.append(x * 2)",
                    ],
                ),
                Slot::new(
                    "filter",
                    &[
                        "    result = [x for x in result if x > 0]",
                        "    result = list(filter(lambda x: x > 0, result))",
                        "    result.sort()",
                    ],
                ),
                Slot::new(
                    "return",
                    &["    return result", "    return result or []"],
                ),
            ],
        }
    }

    /// Preset catalog: a code-generation prompt built from prose fragments.
    ///
    /// Mirrors the prompt-evolution variant: the evolved artifact is itself
    /// a prompt, scored through the two-stage pipeline.
    pub fn codegen_prompt_demo() -> Self {
        Self {
            kind: ArtifactKind::PromptSkeleton,
            slots: vec![
                Slot::new(
                    "role",
                    &[
                        "You are an expert Python developer.",
                        "You are a careful software engineer.",
                        "Act as a senior code reviewer who writes code.",
                    ],
                ),
                Slot::new(
                    "task",
                    &[
                        "Write a function that deduplicates a list while preserving order.",
                        "Implement order-preserving deduplication of a list.",
                    ],
                ),
                Slot::new(
                    "quality",
                    &[
                        "Favor clarity over cleverness.",
                        "Optimize for readability and correctness.",
                        "Keep it short and idiomatic.",
                    ],
                ),
                Slot::new(
                    "constraints",
                    &[
                        "Include type hints and a docstring.",
                        "Handle the empty-input case explicitly.",
                        "Do not use external libraries.",
                    ],
                ),
                Slot::new(
                    "format",
                    &[
                        "Respond with only the code.",
                        "Respond with the code followed by one usage example.",
                    ],
                ),
            ],
        }
    }
}

/// Catalog validation errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog must contain at least one slot")]
    NoSlots,
    #[error("Slot {slot} has no alternatives")]
    EmptySlot { slot: usize },
}
