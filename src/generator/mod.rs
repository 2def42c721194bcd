//! Generator Module
//!
//! The external generation capability. The core only depends on the
//! [`PhraseGenerator`] trait; the LLM-backed implementation lives alongside.

mod llm;
mod provider;

pub use llm::LlmPhraseGenerator;
pub use provider::{LLMProvider, OpenAICompatibleProvider};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::config::LlmConfig;

/// Ask for an activity phrase with a number of mimeable components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementRequest {
    pub component_count: usize,
    /// Words the generator should stay away from
    pub forbidden: Vec<String>,
    /// Keep this activity and only produce components for it
    pub activity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDraft {
    #[serde(rename = "activityVerb")]
    pub activity_verb: String,
    pub components: Vec<String>,
}

/// Ask for an incongruous replacement for each original word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementRequest {
    pub activity: String,
    pub originals: Vec<String>,
    pub forbidden: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementPair {
    pub original: String,
    pub replacement: String,
}

/// Source of candidate phrases. Calls may be slow, rate-limited or fail;
/// every failure is treated as a reason to fall back.
#[async_trait]
pub trait PhraseGenerator: Send + Sync {
    async fn generate_statement(&self, request: &StatementRequest) -> Result<StatementDraft>;

    async fn generate_replacements(&self, request: &ReplacementRequest) -> Result<Vec<ReplacementPair>>;
}

/// The LLM-backed generator, or `None` when no API key is configured.
pub fn build_generator(config: &LlmConfig) -> Result<Option<Arc<dyn PhraseGenerator>>> {
    if !config.is_configured() {
        warn!("CHARADES_LLM_API_KEY is not set, generator disabled");
        return Ok(None);
    }

    let provider = OpenAICompatibleProvider::from_config(config)?;
    Ok(Some(Arc::new(LlmPhraseGenerator::new(
        Arc::new(provider),
        config.model.clone(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_generator_needs_api_key() {
        assert!(build_generator(&LlmConfig::default()).unwrap().is_none());

        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        assert!(build_generator(&config).unwrap().is_some());
    }
}
