//! Unique candidate resolution
//!
//! Walks a [`Ladder`] for one slot until a candidate passes every check, and
//! records the winner. The terminal rung cannot fail, so `resolve` always
//! returns a value.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::ladder::{EscalationLevel, GenerationAttemptState, Ladder, Strategy};
use super::mutation;
use super::proposer::CandidateProposer;
use crate::fallback::{classify, is_generic_term, CategoryFallbackGenerator};
use crate::registry::{NormalizedWord, RecentWords, WordRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Activity,
    Component,
    Replacement,
}

/// What is being resolved, with the context the checks need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub kind: SlotKind,
    /// The statement's activity, once known
    pub activity: Option<String>,
    /// The word a replacement stands in for
    pub original: Option<String>,
}

impl Slot {
    pub fn activity() -> Self {
        Self {
            kind: SlotKind::Activity,
            activity: None,
            original: None,
        }
    }

    pub fn component(activity: &str) -> Self {
        Self {
            kind: SlotKind::Component,
            activity: Some(activity.to_string()),
            original: None,
        }
    }

    pub fn replacement(activity: &str, original: &str) -> Self {
        Self {
            kind: SlotKind::Replacement,
            activity: Some(activity.to_string()),
            original: Some(original.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Empty,
    AlreadyTried,
    Generic,
    BatchDuplicate,
    /// Same category as the original it replaces
    Congruous,
    Used,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub level: EscalationLevel,
    /// The used phrase a mutated or suffixed value was built from
    pub base: Option<String>,
}

pub struct UniqueCandidateResolver {
    registry: Arc<WordRegistry>,
    fallback: Arc<CategoryFallbackGenerator>,
    recent: Mutex<RecentWords>,
}

impl UniqueCandidateResolver {
    pub fn new(registry: Arc<WordRegistry>, fallback: Arc<CategoryFallbackGenerator>, tracking_limit: usize) -> Self {
        Self {
            registry,
            fallback,
            recent: Mutex::new(RecentWords::new(tracking_limit)),
        }
    }

    pub fn registry(&self) -> &Arc<WordRegistry> {
        &self.registry
    }

    pub fn fallback(&self) -> &Arc<CategoryFallbackGenerator> {
        &self.fallback
    }

    /// Words surfaced this session, oldest first
    pub fn recent_words(&self) -> Vec<String> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Run the ladder for one slot. `batch` holds the normalized values
    /// already accepted in the same batch and receives the winner.
    pub async fn resolve(
        &self,
        slot: &Slot,
        ladder: &Ladder,
        mut proposer: Option<&mut (dyn CandidateProposer + 'static)>,
        batch: &mut HashSet<String>,
    ) -> Resolved {
        let mut state = GenerationAttemptState::new();

        for step in ladder.steps() {
            state.escalate(step.level());
            match *step {
                Strategy::Proposer { attempts } => {
                    let Some(proposer) = proposer.as_mut() else {
                        continue;
                    };
                    for attempt in 1..=attempts {
                        let candidate = match proposer.propose(&state).await {
                            Ok(Some(candidate)) => candidate,
                            Ok(None) => break,
                            Err(e) => {
                                warn!("{:?} proposer attempt {} failed: {:#}", slot.kind, attempt, e);
                                continue;
                            }
                        };

                        match self.evaluate(slot, &candidate, None, &state, batch).await {
                            Verdict::Accepted => {
                                return self.accept(candidate, EscalationLevel::Proposer, None, batch).await;
                            }
                            Verdict::BatchDuplicate => {
                                debug!("'{}' already in this batch, falling back", candidate);
                                state.reject(&candidate);
                                break;
                            }
                            verdict => {
                                debug!("Rejected '{}' ({:?})", candidate, verdict);
                                state.reject(&candidate);
                            }
                        }
                    }
                }
                Strategy::CategoryFallback => {
                    for candidate in self.fallback_candidates(slot) {
                        if self.evaluate(slot, &candidate, None, &state, batch).await == Verdict::Accepted {
                            return self
                                .accept(candidate, EscalationLevel::CategoryFallback, None, batch)
                                .await;
                        }
                    }
                    debug!("Fallback vocabulary exhausted for {:?} slot", slot.kind);
                }
                Strategy::Mutation => {
                    let base = self.mutation_base(&state);
                    for candidate in mutation::candidates(&base, &self.fallback) {
                        if self
                            .evaluate(slot, &candidate, Some(&base), &state, batch)
                            .await
                            == Verdict::Accepted
                        {
                            return self
                                .accept(candidate, EscalationLevel::Mutation, Some(base), batch)
                                .await;
                        }
                    }
                }
                Strategy::TerminalSuffix => {
                    let (value, base) = self.terminal(slot, &state, batch).await;
                    info!("{:?} slot resolved by terminal suffix: {}", slot.kind, value);
                    return self.accept(value, EscalationLevel::TerminalSuffix, base, batch).await;
                }
            }
        }

        unreachable!("escalation ladder always ends with TerminalSuffix")
    }

    /// Resolve slots in order, sharing one batch so no two results are equal.
    pub async fn resolve_batch(
        &self,
        slots: Vec<(Slot, Option<Box<dyn CandidateProposer>>)>,
        ladder: &Ladder,
    ) -> Vec<Resolved> {
        let mut batch = HashSet::new();
        let mut resolved = Vec::with_capacity(slots.len());
        for (slot, mut proposer) in slots {
            resolved.push(self.resolve(&slot, ladder, proposer.as_deref_mut(), &mut batch).await);
        }
        resolved
    }

    pub async fn evaluate(
        &self,
        slot: &Slot,
        candidate: &str,
        base: Option<&str>,
        state: &GenerationAttemptState,
        batch: &HashSet<String>,
    ) -> Verdict {
        let Some(normalized) = NormalizedWord::new(candidate) else {
            return Verdict::Empty;
        };
        if state.was_rejected(candidate) {
            return Verdict::AlreadyTried;
        }
        if slot.kind != SlotKind::Activity && is_generic_term(candidate) {
            return Verdict::Generic;
        }
        if batch.contains(normalized.as_str()) {
            return Verdict::BatchDuplicate;
        }
        if let Some(original) = &slot.original {
            if NormalizedWord::new(original).as_ref() == Some(&normalized) {
                return Verdict::Congruous;
            }
            // The original's category falls back to the activity's.
            let original_category = self.fallback.category_of(original, slot.activity.as_deref());
            if !original_category.is_generic() && classify(candidate) == Some(original_category) {
                return Verdict::Congruous;
            }
        }

        let used = match base {
            Some(base) => self.registry.is_extension_used(candidate, base).await,
            None => self.registry.is_phrase_used(candidate).await,
        };
        if used {
            Verdict::Used
        } else {
            Verdict::Accepted
        }
    }

    async fn accept(
        &self,
        value: String,
        level: EscalationLevel,
        base: Option<String>,
        batch: &mut HashSet<String>,
    ) -> Resolved {
        let value = value.trim().to_string();
        self.registry.record_phrase(&value).await;
        if let Some(normalized) = NormalizedWord::new(&value) {
            batch.insert(normalized.into_string());
        }
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(&value);
        Resolved { value, level, base }
    }

    fn fallback_candidates(&self, slot: &Slot) -> Vec<String> {
        match slot.kind {
            SlotKind::Activity => self
                .fallback
                .activity_candidates()
                .into_iter()
                .map(str::to_string)
                .collect(),
            SlotKind::Component => self
                .fallback
                .component_candidates(slot.activity.as_deref().unwrap_or_default())
                .into_iter()
                .map(|c| c.phrase.to_string())
                .collect(),
            SlotKind::Replacement => self
                .fallback
                .pick_incongruous(
                    slot.original.as_deref().unwrap_or_default(),
                    slot.activity.as_deref(),
                )
                .into_iter()
                .map(|c| c.phrase.to_string())
                .collect(),
        }
    }

    /// The phrase to decorate: the last proposal that collided, or a random
    /// fallback activity.
    fn mutation_base(&self, state: &GenerationAttemptState) -> String {
        match state.last_proposed() {
            Some(proposed) => proposed.to_string(),
            None => self
                .fallback
                .activity_candidates()
                .first()
                .copied()
                .unwrap_or("playing charades")
                .to_string(),
        }
    }

    async fn terminal(
        &self,
        slot: &Slot,
        state: &GenerationAttemptState,
        batch: &HashSet<String>,
    ) -> (String, Option<String>) {
        if slot.kind == SlotKind::Activity {
            let base = self.mutation_base(state);
            let mut n = 2;
            loop {
                let phrase = mutation::variation(&base, n);
                if !self.registry.exists(&phrase).await {
                    return (phrase, Some(base));
                }
                n += 1;
            }
        }

        loop {
            let synthesized = self.fallback.synthesize(&self.registry).await;
            let normalized = NormalizedWord::new(&synthesized.phrase);
            if normalized.is_some_and(|w| !batch.contains(w.as_str())) {
                return (synthesized.phrase, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::Category;
    use crate::registry::SubwordPolicy;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Result<Option<String>>>);

    impl Scripted {
        fn new(items: &[&str]) -> Self {
            Self(items.iter().map(|s| Ok(Some(s.to_string()))).collect())
        }
    }

    #[async_trait]
    impl CandidateProposer for Scripted {
        async fn propose(&mut self, _state: &GenerationAttemptState) -> Result<Option<String>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    fn resolver() -> UniqueCandidateResolver {
        UniqueCandidateResolver::new(
            Arc::new(WordRegistry::in_memory(SubwordPolicy::default())),
            Arc::new(CategoryFallbackGenerator::with_seed(7)),
            100,
        )
    }

    #[tokio::test]
    async fn test_proposer_value_accepted_and_recorded() {
        let resolver = resolver();
        let mut proposer = Scripted::new(&["walking a dog"]);
        let resolved = resolver
            .resolve(&Slot::activity(), &Ladder::activity(), Some(&mut proposer), &mut HashSet::new())
            .await;

        assert_eq!(resolved.value, "walking a dog");
        assert_eq!(resolved.level, EscalationLevel::Proposer);
        assert!(resolver.registry().exists("walking a dog").await);
        assert!(resolver.registry().exists("walking").await);
        assert_eq!(resolver.recent_words(), vec!["walking a dog".to_string()]);
    }

    #[tokio::test]
    async fn test_used_activity_is_mutated() {
        let resolver = resolver();
        resolver.registry().add("juggling").await;
        // Every fallback activity is used too, so mutation is the first rung
        // that can succeed.
        for activity in resolver.fallback().activity_candidates() {
            resolver.registry().record_phrase(activity).await;
        }

        let mut proposer = Scripted::new(&["juggling"]);
        let resolved = resolver
            .resolve(&Slot::activity(), &Ladder::activity(), Some(&mut proposer), &mut HashSet::new())
            .await;

        assert_eq!(resolved.level, EscalationLevel::Mutation);
        assert_eq!(resolved.base.as_deref(), Some("juggling"));
        assert_ne!(resolved.value, "juggling");
        assert!(resolved.value.contains("juggling"));
    }

    #[tokio::test]
    async fn test_generic_component_rejected() {
        let resolver = resolver();
        let mut proposer = Scripted::new(&["thing", "stuff", "leash"]);
        let resolved = resolver
            .resolve(
                &Slot::component("walking a dog"),
                &Ladder::component(),
                Some(&mut proposer),
                &mut HashSet::new(),
            )
            .await;
        assert_eq!(resolved.value, "leash");
    }

    #[tokio::test]
    async fn test_batch_duplicate_skips_to_fallback() {
        let resolver = resolver();
        let mut batch = HashSet::new();
        batch.insert("whisk".to_string());

        let mut proposer = Scripted::new(&["whisk", "spatula"]);
        let resolved = resolver
            .resolve(
                &Slot::component("baking a cake"),
                &Ladder::component(),
                Some(&mut proposer),
                &mut batch,
            )
            .await;

        assert_eq!(resolved.level, EscalationLevel::CategoryFallback);
        assert_ne!(resolved.value, "whisk");
        assert!(batch.contains(&resolved.value));
    }

    #[tokio::test]
    async fn test_congruous_replacement_rejected() {
        let resolver = resolver();
        let mut proposer = Scripted::new(&["lion"]);
        let resolved = resolver
            .resolve(
                &Slot::replacement("visiting the zoo", "tiger"),
                &Ladder::replacement(),
                Some(&mut proposer),
                &mut HashSet::new(),
            )
            .await;

        assert_eq!(resolved.level, EscalationLevel::CategoryFallback);
        assert_ne!(classify(&resolved.value), classify("tiger"));
    }

    #[tokio::test]
    async fn test_replacement_from_activity_category_rejected() {
        let resolver = resolver();
        let mut proposer = Scripted::new(&["spatula"]);
        let resolved = resolver
            .resolve(
                &Slot::replacement("cooking dinner", "sourdough starter"),
                &Ladder::replacement(),
                Some(&mut proposer),
                &mut HashSet::new(),
            )
            .await;

        let original = resolver.fallback().category_of("sourdough starter", Some("cooking dinner"));
        assert_eq!(original, Category::Kitchenware);
        assert_ne!(resolved.value, "spatula");
        assert_eq!(resolved.level, EscalationLevel::CategoryFallback);
        assert_ne!(classify(&resolved.value), Some(original));
    }

    #[tokio::test]
    async fn test_offline_batch_is_distinct() {
        let resolver = resolver();
        let slots = (0..5)
            .map(|_| (Slot::component("baking a cake"), None))
            .collect();
        let resolved = resolver.resolve_batch(slots, &Ladder::component()).await;

        let values: HashSet<String> = resolved.iter().map(|r| r.value.to_lowercase()).collect();
        assert_eq!(values.len(), 5);
    }

    #[tokio::test]
    async fn test_terminal_suffix_when_everything_is_used() {
        let resolver = resolver();
        let ladder = Ladder::new(vec![Strategy::TerminalSuffix]);
        resolver.registry().add("juggling").await;
        resolver.registry().add("juggling (variation 2)").await;

        let mut proposer = Scripted::new(&["juggling"]);
        let resolved = resolver
            .resolve(
                &Slot::activity(),
                &Ladder::new(vec![Strategy::Proposer { attempts: 1 }, Strategy::TerminalSuffix]),
                Some(&mut proposer),
                &mut HashSet::new(),
            )
            .await;
        assert_eq!(resolved.value, "juggling (variation 3)");
        assert_eq!(resolved.level, EscalationLevel::TerminalSuffix);

        let component = resolver
            .resolve(&Slot::component("juggling"), &ladder, None, &mut HashSet::new())
            .await;
        assert_eq!(component.level, EscalationLevel::TerminalSuffix);
        assert!(!component.value.is_empty());
    }
}
