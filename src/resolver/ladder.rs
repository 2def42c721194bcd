//! Escalation ladder
//!
//! One ordered list of strategies per slot kind. The resolver walks it top to
//! bottom; the last rung always produces an unused phrase.

use std::collections::HashSet;

use crate::registry::NormalizedWord;

/// Generator calls for an activity phrase before falling back
pub const ACTIVITY_PROPOSER_ATTEMPTS: usize = 15;
/// Extra generator calls for a component that came back generic or used
pub const COMPONENT_REGENERATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EscalationLevel {
    Proposer,
    CategoryFallback,
    Mutation,
    TerminalSuffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ask the slot's proposer up to `attempts` times
    Proposer { attempts: usize },
    /// Walk the fallback vocabulary for the slot
    CategoryFallback,
    /// Decorate an already-used phrase with modifiers
    Mutation,
    /// Counter-suffixed phrase, unused by construction
    TerminalSuffix,
}

impl Strategy {
    pub fn level(&self) -> EscalationLevel {
        match self {
            Self::Proposer { .. } => EscalationLevel::Proposer,
            Self::CategoryFallback => EscalationLevel::CategoryFallback,
            Self::Mutation => EscalationLevel::Mutation,
            Self::TerminalSuffix => EscalationLevel::TerminalSuffix,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
    steps: Vec<Strategy>,
}

impl Ladder {
    /// Panics unless the ladder ends in `TerminalSuffix`; anything else could
    /// run out of candidates.
    pub fn new(steps: Vec<Strategy>) -> Self {
        assert!(
            matches!(steps.last(), Some(Strategy::TerminalSuffix)),
            "escalation ladder must end with TerminalSuffix"
        );
        Self { steps }
    }

    pub fn activity() -> Self {
        Self::new(vec![
            Strategy::Proposer {
                attempts: ACTIVITY_PROPOSER_ATTEMPTS,
            },
            Strategy::CategoryFallback,
            Strategy::Mutation,
            Strategy::TerminalSuffix,
        ])
    }

    pub fn component() -> Self {
        Self::new(vec![
            Strategy::Proposer {
                attempts: 1 + COMPONENT_REGENERATIONS,
            },
            Strategy::CategoryFallback,
            Strategy::TerminalSuffix,
        ])
    }

    pub fn replacement() -> Self {
        Self::new(vec![
            Strategy::Proposer { attempts: 1 },
            Strategy::CategoryFallback,
            Strategy::TerminalSuffix,
        ])
    }

    pub fn steps(&self) -> &[Strategy] {
        &self.steps
    }
}

/// Per-slot bookkeeping for a single resolution
#[derive(Debug, Clone)]
pub struct GenerationAttemptState {
    rejected: HashSet<String>,
    last_proposed: Option<String>,
    level: EscalationLevel,
}

impl Default for GenerationAttemptState {
    fn default() -> Self {
        Self {
            rejected: HashSet::new(),
            last_proposed: None,
            level: EscalationLevel::Proposer,
        }
    }
}

impl GenerationAttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a proposer candidate that did not pass.
    pub fn reject(&mut self, candidate: &str) {
        if let Some(word) = NormalizedWord::new(candidate) {
            self.last_proposed = Some(word.as_str().to_string());
            self.rejected.insert(word.into_string());
        }
    }

    pub fn was_rejected(&self, candidate: &str) -> bool {
        NormalizedWord::new(candidate).is_some_and(|w| self.rejected.contains(w.as_str()))
    }

    pub fn rejected(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(String::as_str)
    }

    /// Most recent proposer candidate that collided
    pub fn last_proposed(&self) -> Option<&str> {
        self.last_proposed.as_deref()
    }

    pub fn escalate(&mut self, level: EscalationLevel) {
        self.level = self.level.max(level);
    }

    pub fn level(&self) -> EscalationLevel {
        self.level
    }
}
