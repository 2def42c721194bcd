//! Statement generation
//!
//! The outermost operation: one activity, its components and an incongruous
//! replacement for each. Everything below this point recovers locally; the
//! only error that escapes is `GenerationUnavailable`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CharadesConfig;
use crate::error::CharadesError;
use crate::fallback::CategoryFallbackGenerator;
use crate::generator::{PhraseGenerator, ReplacementPair, ReplacementRequest};
use crate::registry::{NormalizedWord, WordRegistry};
use crate::resolver::{
    ActivityProposer, CandidateProposer, ComponentProposer, Ladder, SeedProposer, Slot, UniqueCandidateResolver,
};

/// Replacement calls before the generator's answer is given up on
pub const REPLACEMENT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub activity: String,
    pub components: Vec<String>,
    pub replacements: Vec<ReplacementPair>,
}

pub struct StatementGenerator {
    resolver: UniqueCandidateResolver,
    generator: Option<Arc<dyn PhraseGenerator>>,
    num_components: usize,
}

impl StatementGenerator {
    pub fn new(
        registry: Arc<WordRegistry>,
        generator: Option<Arc<dyn PhraseGenerator>>,
        config: &CharadesConfig,
    ) -> Self {
        Self::with_fallback(registry, generator, Arc::new(CategoryFallbackGenerator::new()), config)
    }

    pub fn with_fallback(
        registry: Arc<WordRegistry>,
        generator: Option<Arc<dyn PhraseGenerator>>,
        fallback: Arc<CategoryFallbackGenerator>,
        config: &CharadesConfig,
    ) -> Self {
        Self {
            resolver: UniqueCandidateResolver::new(registry, fallback, config.tracking_limit),
            generator,
            num_components: config.num_components,
        }
    }

    pub fn resolver(&self) -> &UniqueCandidateResolver {
        &self.resolver
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Generate a statement with the configured generator. Fails only when
    /// there is no generator at all.
    pub async fn generate(&self) -> Result<Statement> {
        let generator = self
            .generator
            .clone()
            .ok_or(CharadesError::GenerationUnavailable)?;
        Ok(self.build(Some(generator)).await)
    }

    /// Generate a statement from fallback content only.
    pub async fn generate_offline(&self) -> Statement {
        self.build(None).await
    }

    /// Offline requests use fallback content; anything else needs the
    /// generator and fails with `GenerationUnavailable` without one.
    pub async fn generate_for(&self, offline: bool) -> Result<Statement> {
        if offline {
            Ok(self.generate_offline().await)
        } else {
            self.generate().await
        }
    }

    async fn build(&self, generator: Option<Arc<dyn PhraseGenerator>>) -> Statement {
        let forbidden = self.resolver.recent_words();

        let mut activity_proposer = generator
            .as_ref()
            .map(|g| ActivityProposer::new(g.clone(), self.num_components, forbidden.clone()));
        let resolved = self
            .resolver
            .resolve(
                &Slot::activity(),
                &Ladder::activity(),
                activity_proposer
                    .as_mut()
                    .map(|p| p as &mut (dyn CandidateProposer + 'static)),
                &mut HashSet::new(),
            )
            .await;
        let activity = resolved.value;

        // A mutated activity keeps the components drafted for its base.
        let seeds = activity_proposer
            .and_then(|p| p.components_for(resolved.base.as_deref().unwrap_or(activity.as_str())))
            .unwrap_or_default();

        let component_slots = (0..self.num_components)
            .map(|i| {
                let proposer: Box<dyn CandidateProposer> = Box::new(ComponentProposer::new(
                    seeds.get(i).cloned(),
                    generator.clone(),
                    activity.as_str(),
                    forbidden.clone(),
                ));
                (Slot::component(&activity), Some(proposer))
            })
            .collect();
        let components: Vec<String> = self
            .resolver
            .resolve_batch(component_slots, &Ladder::component())
            .await
            .into_iter()
            .map(|r| r.value)
            .collect();

        let suggestions = match &generator {
            Some(generator) => self.replacement_suggestions(generator, &activity, &components).await,
            None => HashMap::new(),
        };

        let replacement_slots = components
            .iter()
            .map(|original| {
                let seed = NormalizedWord::new(original).and_then(|w| suggestions.get(w.as_str()).cloned());
                let proposer: Box<dyn CandidateProposer> = Box::new(SeedProposer::new(seed));
                (Slot::replacement(&activity, original), Some(proposer))
            })
            .collect();
        let replacements = self
            .resolver
            .resolve_batch(replacement_slots, &Ladder::replacement())
            .await
            .into_iter()
            .zip(&components)
            .map(|(r, original)| ReplacementPair {
                original: original.clone(),
                replacement: r.value,
            })
            .collect();

        info!("Generated statement for '{}' with {} components", activity, components.len());
        Statement {
            activity,
            components,
            replacements,
        }
    }

    /// Ask the generator for replacements, retrying malformed answers. Keys
    /// are normalized originals.
    async fn replacement_suggestions(
        &self,
        generator: &Arc<dyn PhraseGenerator>,
        activity: &str,
        components: &[String],
    ) -> HashMap<String, String> {
        let request = ReplacementRequest {
            activity: activity.to_string(),
            originals: components.to_vec(),
            forbidden: self.resolver.recent_words(),
        };

        for attempt in 1..=REPLACEMENT_ATTEMPTS {
            match generator.generate_replacements(&request).await {
                Ok(pairs) => {
                    return pairs
                        .into_iter()
                        .filter_map(|p| NormalizedWord::new(&p.original).map(|o| (o.into_string(), p.replacement)))
                        .collect();
                }
                Err(e) => warn!("Replacement attempt {} failed: {:#}", attempt, e),
            }
        }
        warn!("Using fallback replacements for '{}'", activity);
        HashMap::new()
    }
}
