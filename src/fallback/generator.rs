//! Category Fallback Generator
//!
//! Produces candidates without the external generator: shuffled category
//! vocabularies for incongruous picks, a shuffled activity list, and an
//! adjective + noun synthesizer whose terminal form always yields an unused
//! phrase.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use super::categories::{classify, infer_from_activity, Category, FALLBACK_ACTIVITIES, SEED_ADJECTIVES, SEED_NOUNS};
use crate::registry::WordRegistry;

/// Adjective + noun draws before switching to the counter suffix
pub const SYNTH_ATTEMPTS: usize = 20;

/// A vocabulary word offered as a fallback, with the bucket it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackCandidate {
    pub phrase: &'static str,
    pub category: Category,
}

/// Result of [`CategoryFallbackGenerator::synthesize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub phrase: String,
    /// Registry checks performed, including the successful one
    pub attempts: usize,
    /// Whether the counter suffix was needed
    pub terminal: bool,
}

pub struct CategoryFallbackGenerator {
    rng: Mutex<StdRng>,
    counter: AtomicU64,
}

impl CategoryFallbackGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible shuffles for tests
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            counter: AtomicU64::new(Utc::now().timestamp_millis().max(0) as u64),
        }
    }

    pub(crate) fn shuffled<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        out.shuffle(&mut *rng);
        out
    }

    fn choose(&self, items: &[&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        items.choose(&mut *rng).copied().unwrap_or("mystery")
    }

    /// Category of a term: its own words first, then the activity it appears
    /// in, then `Generic`.
    pub fn category_of(&self, term: &str, activity: Option<&str>) -> Category {
        classify(term)
            .or_else(|| activity.and_then(infer_from_activity))
            .unwrap_or(Category::Generic)
    }

    fn candidates_from(&self, categories: &[Category]) -> Vec<FallbackCandidate> {
        categories
            .iter()
            .flat_map(|&category| {
                self.shuffled(category.words())
                    .into_iter()
                    .map(move |phrase| FallbackCandidate { phrase, category })
            })
            .collect()
    }

    /// Candidates from every category except the original's. Categories and
    /// words are both shuffled; the caller tests them in order and treats the
    /// end of the list as exhaustion.
    pub fn pick_incongruous(&self, original: &str, activity: Option<&str>) -> Vec<FallbackCandidate> {
        let excluded = self.category_of(original, activity);
        debug!("Incongruous picks for '{}' exclude {}", original, excluded.display_name());
        let others: Vec<Category> = Category::vocabulary()
            .iter()
            .copied()
            .filter(|c| *c != excluded)
            .collect();
        self.candidates_from(&self.shuffled(&others))
    }

    /// Component candidates: the activity's own category first, then the rest.
    pub fn component_candidates(&self, activity: &str) -> Vec<FallbackCandidate> {
        let primary = infer_from_activity(activity);
        let mut order: Vec<Category> = primary.into_iter().collect();
        let rest: Vec<Category> = Category::vocabulary()
            .iter()
            .copied()
            .filter(|c| Some(*c) != primary)
            .collect();
        order.extend(self.shuffled(&rest));
        self.candidates_from(&order)
    }

    pub fn activity_candidates(&self) -> Vec<&'static str> {
        self.shuffled(FALLBACK_ACTIVITIES)
    }

    /// Next value of the monotonically increasing suffix counter
    pub fn next_counter(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn synthesize(&self, registry: &WordRegistry) -> Synthesized {
        self.synthesize_from(registry, SEED_ADJECTIVES, SEED_NOUNS).await
    }

    /// Random "adjective noun" compounds, then "special <counter> <noun>".
    pub async fn synthesize_from(
        &self,
        registry: &WordRegistry,
        adjectives: &[&'static str],
        nouns: &[&'static str],
    ) -> Synthesized {
        for attempt in 1..=SYNTH_ATTEMPTS {
            let phrase = format!("{} {}", self.choose(adjectives), self.choose(nouns));
            if !registry.is_phrase_used(&phrase).await {
                return Synthesized {
                    phrase,
                    attempts: attempt,
                    terminal: false,
                };
            }
        }

        debug!("Synthesizer exhausted after {} draws, using counter suffix", SYNTH_ATTEMPTS);
        let noun = self.choose(nouns);
        let mut attempts = SYNTH_ATTEMPTS;
        loop {
            attempts += 1;
            let phrase = format!("special {} {}", self.next_counter(), noun);
            // Only the whole phrase matters here: "special" and the noun are
            // expected to be used already.
            if !registry.exists(&phrase).await {
                return Synthesized {
                    phrase,
                    attempts,
                    terminal: true,
                };
            }
        }
    }
}

impl Default for CategoryFallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}
