//! LLM-backed phrase generator
//!
//! Builds the prompts, pulls the JSON payload out of whatever prose the model
//! wraps around it, and validates the shape before anything reaches the
//! resolver.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::{LLMProvider, PhraseGenerator, ReplacementPair, ReplacementRequest, StatementDraft, StatementRequest};
use crate::error::CharadesError;

const SYSTEM_PROMPT: &str = "You write prompts for a party game of charades. \
Every noun you produce must be concrete and easy to mime. Reply with JSON only.";

/// Forbidden words beyond this are left out of prompts
const MAX_FORBIDDEN_IN_PROMPT: usize = 200;

#[derive(Deserialize)]
struct RawDraft {
    #[serde(rename = "activityVerb", alias = "activity", default)]
    activity_verb: Option<String>,
    #[serde(default)]
    components: Vec<String>,
}

pub struct LlmPhraseGenerator {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl LlmPhraseGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn forbidden_clause(forbidden: &[String]) -> String {
        if forbidden.is_empty() {
            return String::new();
        }
        let start = forbidden.len().saturating_sub(MAX_FORBIDDEN_IN_PROMPT);
        format!(
            "\nDo not use any of these words or phrases: {}.",
            forbidden[start..].join(", ")
        )
    }

    fn statement_prompt(request: &StatementRequest) -> String {
        let task = match &request.activity {
            Some(activity) => format!(
                "The activity is \"{}\". List {} different physical objects someone would use while doing it.",
                activity, request.component_count
            ),
            None => format!(
                "Invent a fun, mimeable activity (a verb phrase such as \"walking a dog\") and list {} different physical objects used while doing it.",
                request.component_count
            ),
        };
        format!(
            "{}{}\nAnswer with a JSON object: {{\"activityVerb\": string, \"components\": [string]}}",
            task,
            Self::forbidden_clause(&request.forbidden)
        )
    }

    fn replacement_prompt(request: &ReplacementRequest) -> String {
        format!(
            "The activity is \"{}\". For each of these objects: {}, suggest a replacement object that is \
absurd in this activity and belongs to a completely different kind of thing.{}\n\
Answer with a JSON array: [{{\"original\": string, \"replacement\": string}}]",
            request.activity,
            request.originals.join(", "),
            Self::forbidden_clause(&request.forbidden)
        )
    }

    pub(crate) fn parse_statement(text: &str, request: &StatementRequest) -> Result<StatementDraft> {
        let object_re = Regex::new(r"(?s)\{.*\}")?;
        let json = object_re
            .find(text)
            .ok_or_else(|| CharadesError::malformed("no JSON object in response"))?;
        let raw: RawDraft = serde_json::from_str(json.as_str())
            .map_err(|e| CharadesError::malformed(format!("statement JSON: {}", e)))?;

        let activity_verb = raw
            .activity_verb
            .filter(|a| !a.trim().is_empty())
            .or_else(|| request.activity.clone())
            .ok_or_else(|| CharadesError::malformed("missing activityVerb"))?;

        let components: Vec<String> = raw
            .components
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if components.len() != request.component_count {
            return Err(CharadesError::malformed(format!(
                "expected {} components, got {}",
                request.component_count,
                components.len()
            ))
            .into());
        }

        Ok(StatementDraft {
            activity_verb: activity_verb.trim().to_string(),
            components,
        })
    }

    pub(crate) fn parse_replacements(text: &str, request: &ReplacementRequest) -> Result<Vec<ReplacementPair>> {
        let array_re = Regex::new(r"(?s)\[.*\]")?;
        let json = array_re
            .find(text)
            .ok_or_else(|| CharadesError::malformed("no JSON array in response"))?;
        let pairs: Vec<ReplacementPair> = serde_json::from_str(json.as_str())
            .map_err(|e| CharadesError::malformed(format!("replacement JSON: {}", e)))?;

        if pairs.len() != request.originals.len() {
            return Err(CharadesError::malformed(format!(
                "expected {} replacements, got {}",
                request.originals.len(),
                pairs.len()
            ))
            .into());
        }

        for pair in &pairs {
            let known = request
                .originals
                .iter()
                .any(|o| o.trim().eq_ignore_ascii_case(pair.original.trim()));
            if !known || pair.replacement.trim().is_empty() {
                return Err(CharadesError::malformed(format!(
                    "unexpected pair {} -> {}",
                    pair.original, pair.replacement
                ))
                .into());
            }
        }
        Ok(pairs)
    }
}

#[async_trait]
impl PhraseGenerator for LlmPhraseGenerator {
    async fn generate_statement(&self, request: &StatementRequest) -> Result<StatementDraft> {
        let prompt = Self::statement_prompt(request);
        let response = self
            .provider
            .generate(&self.model, prompt, Some(SYSTEM_PROMPT.to_string()))
            .await
            .context("Statement generation call failed")?;
        debug!("Statement response: {}", crate::utils::truncate(&response, 200));
        Self::parse_statement(&response, request)
    }

    async fn generate_replacements(&self, request: &ReplacementRequest) -> Result<Vec<ReplacementPair>> {
        let prompt = Self::replacement_prompt(request);
        let response = self
            .provider
            .generate(&self.model, prompt, Some(SYSTEM_PROMPT.to_string()))
            .await
            .context("Replacement generation call failed")?;
        debug!("Replacement response: {}", crate::utils::truncate(&response, 200));
        Self::parse_replacements(&response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn generate(&self, _model: &str, prompt: String, _system: Option<String>) -> Result<String> {
            self.prompts.lock().await.push(prompt);
            self.responses
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn request(count: usize) -> StatementRequest {
        StatementRequest {
            component_count: count,
            forbidden: vec!["tiger".to_string()],
            activity: None,
        }
    }

    #[tokio::test]
    async fn test_statement_parsed_from_prose() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Sure! ```json\n{\"activityVerb\": \"walking a dog\", \"components\": [\"leash\", \"ball\"]}\n```",
        ]));
        let generator = LlmPhraseGenerator::new(provider.clone(), "test-model");

        let draft = generator.generate_statement(&request(2)).await.unwrap();
        assert_eq!(draft.activity_verb, "walking a dog");
        assert_eq!(draft.components, vec!["leash", "ball"]);

        let prompts = provider.prompts.lock().await;
        assert!(prompts[0].contains("tiger"));
    }

    #[test]
    fn test_wrong_component_count_is_malformed() {
        let err = LlmPhraseGenerator::parse_statement(
            r#"{"activityVerb": "juggling", "components": ["ball"]}"#,
            &request(3),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CharadesError>(),
            Some(CharadesError::MalformedCandidate(_))
        ));
    }

    #[test]
    fn test_activity_hint_fills_missing_verb() {
        let req = StatementRequest {
            component_count: 1,
            forbidden: Vec::new(),
            activity: Some("juggling".to_string()),
        };
        let draft = LlmPhraseGenerator::parse_statement(r#"{"components": ["pins"]}"#, &req).unwrap();
        assert_eq!(draft.activity_verb, "juggling");
    }

    #[test]
    fn test_replacements_validated_against_originals() {
        let req = ReplacementRequest {
            activity: "baking".to_string(),
            originals: vec!["oven mitt".to_string(), "whisk".to_string()],
            forbidden: Vec::new(),
        };

        let ok = LlmPhraseGenerator::parse_replacements(
            r#"[{"original": "Oven Mitt", "replacement": "penguin"}, {"original": "whisk", "replacement": "tuba"}]"#,
            &req,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);

        let unknown = LlmPhraseGenerator::parse_replacements(
            r#"[{"original": "spoon", "replacement": "penguin"}, {"original": "whisk", "replacement": "tuba"}]"#,
            &req,
        );
        assert!(unknown.is_err());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let generator = LlmPhraseGenerator::new(Arc::new(ScriptedProvider::new(&[])), "test-model");
        assert!(generator.generate_statement(&request(2)).await.is_err());
    }
}
