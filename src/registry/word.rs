//! Word types used as dedup keys

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, lowercased word or phrase. The atomic unit of deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedWord(String);

impl NormalizedWord {
    /// Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedWord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decides which tokens of a phrase are tracked on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubwordPolicy {
    /// Tokens strictly longer than this many characters are significant
    pub min_length: usize,
}

impl Default for SubwordPolicy {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

impl SubwordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Never treats a token as significant.
    pub fn disabled() -> Self {
        Self { min_length: usize::MAX }
    }

    pub fn is_significant(&self, token: &str) -> bool {
        token.chars().count() > self.min_length
    }

    /// Significant sub-words of a multi-word phrase, deduplicated, in order.
    /// A single-word phrase has none: the phrase itself is the only key.
    pub fn significant_subwords(&self, phrase: &NormalizedWord) -> Vec<NormalizedWord> {
        let tokens = tokens(phrase.as_str());
        if tokens.len() < 2 {
            return Vec::new();
        }

        let mut out: Vec<NormalizedWord> = Vec::new();
        for token in tokens {
            if !self.is_significant(token) || token == phrase.as_str() {
                continue;
            }
            if let Some(word) = NormalizedWord::new(token) {
                if !out.contains(&word) {
                    out.push(word);
                }
            }
        }
        out
    }
}

/// Whitespace tokens with surrounding punctuation stripped.
pub fn tokens(phrase: &str) -> Vec<&str> {
    phrase
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// A word that has been surfaced to a user at some point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub word: NormalizedWord,
    pub inserted_at: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn new(word: NormalizedWord) -> Self {
        Self {
            word,
            inserted_at: Utc::now(),
        }
    }
}
