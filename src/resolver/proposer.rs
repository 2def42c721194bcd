//! Candidate proposers
//!
//! A proposer is the first rung of every ladder: it yields candidates until
//! it runs dry. Generator failures come back as errors and cost one attempt.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::ladder::GenerationAttemptState;
use crate::generator::{PhraseGenerator, StatementDraft, StatementRequest};
use crate::registry::NormalizedWord;

#[async_trait]
pub trait CandidateProposer: Send {
    /// `Ok(None)` means the proposer has nothing more to offer.
    async fn propose(&mut self, state: &GenerationAttemptState) -> Result<Option<String>>;
}

fn forbidden_with(base: &[String], state: &GenerationAttemptState) -> Vec<String> {
    let mut forbidden = base.to_vec();
    forbidden.extend(state.rejected().map(str::to_string));
    forbidden
}

/// Yields one fixed candidate, then nothing
pub struct SeedProposer {
    seed: Option<String>,
}

impl SeedProposer {
    pub fn new(seed: Option<String>) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl CandidateProposer for SeedProposer {
    async fn propose(&mut self, _state: &GenerationAttemptState) -> Result<Option<String>> {
        Ok(self.seed.take())
    }
}

/// Asks the generator for whole statements and offers their activity. The
/// drafts are kept so the winning activity's components can seed the
/// component slots.
pub struct ActivityProposer {
    generator: Arc<dyn PhraseGenerator>,
    component_count: usize,
    forbidden: Vec<String>,
    drafts: Vec<StatementDraft>,
}

impl ActivityProposer {
    pub fn new(generator: Arc<dyn PhraseGenerator>, component_count: usize, forbidden: Vec<String>) -> Self {
        Self {
            generator,
            component_count,
            forbidden,
            drafts: Vec::new(),
        }
    }

    /// Components the generator paired with `activity`, if it proposed it
    pub fn components_for(&self, activity: &str) -> Option<Vec<String>> {
        let wanted = NormalizedWord::new(activity)?;
        self.drafts
            .iter()
            .rev()
            .find(|d| NormalizedWord::new(&d.activity_verb).as_ref() == Some(&wanted))
            .map(|d| d.components.clone())
    }
}

#[async_trait]
impl CandidateProposer for ActivityProposer {
    async fn propose(&mut self, state: &GenerationAttemptState) -> Result<Option<String>> {
        let request = StatementRequest {
            component_count: self.component_count,
            forbidden: forbidden_with(&self.forbidden, state),
            activity: None,
        };
        let draft = self.generator.generate_statement(&request).await?;
        let activity = draft.activity_verb.clone();
        self.drafts.push(draft);
        Ok(Some(activity))
    }
}

/// Offers the seed component from the statement draft, then asks the
/// generator for single replacements in the same activity.
pub struct ComponentProposer {
    seed: Option<String>,
    generator: Option<Arc<dyn PhraseGenerator>>,
    activity: String,
    forbidden: Vec<String>,
}

impl ComponentProposer {
    pub fn new(
        seed: Option<String>,
        generator: Option<Arc<dyn PhraseGenerator>>,
        activity: impl Into<String>,
        forbidden: Vec<String>,
    ) -> Self {
        Self {
            seed,
            generator,
            activity: activity.into(),
            forbidden,
        }
    }
}

#[async_trait]
impl CandidateProposer for ComponentProposer {
    async fn propose(&mut self, state: &GenerationAttemptState) -> Result<Option<String>> {
        if let Some(seed) = self.seed.take() {
            return Ok(Some(seed));
        }
        let Some(generator) = &self.generator else {
            return Ok(None);
        };

        let request = StatementRequest {
            component_count: 1,
            forbidden: forbidden_with(&self.forbidden, state),
            activity: Some(self.activity.clone()),
        };
        let draft = generator.generate_statement(&request).await?;
        Ok(draft.components.into_iter().next())
    }
}
