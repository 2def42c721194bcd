//! Runtime configuration
//!
//! Everything is read from the environment (optionally seeded from a `.env`
//! file by the binary). Missing variables fall back to defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const MIN_COMPONENTS: usize = 2;
pub const MAX_COMPONENTS: usize = 5;

const DATABASE_FILENAME: &str = "words.db";
const KEY_VALUE_FILENAME: &str = "storage.json";

/// Settings for the external generation capability
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// The generator is only usable with a key.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct CharadesConfig {
    /// Components per statement, always within [MIN_COMPONENTS, MAX_COMPONENTS]
    pub num_components: usize,
    /// Upper bound on durable history rows; oldest are evicted first
    pub max_history_size: Option<usize>,
    /// Size at which the session's recent-word cache resets
    pub tracking_limit: usize,
    /// Phrase tokens longer than this are tracked individually
    pub subword_min_length: usize,
    pub data_dir: PathBuf,
    pub offline: bool,
    pub llm: LlmConfig,
}

impl Default for CharadesConfig {
    fn default() -> Self {
        Self {
            num_components: 3,
            max_history_size: None,
            tracking_limit: 1000,
            subword_min_length: 3,
            data_dir: PathBuf::from(".charades"),
            offline: false,
            llm: LlmConfig::default(),
        }
    }
}

impl CharadesConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let num_components = parse_var("CHARADES_NUM_COMPONENTS")?
            .map(clamp_components)
            .unwrap_or(defaults.num_components);
        let max_history_size = parse_var::<usize>("CHARADES_MAX_HISTORY")?.filter(|n| *n > 0);
        let tracking_limit = parse_var("CHARADES_TRACKING_LIMIT")?.unwrap_or(defaults.tracking_limit);
        let subword_min_length =
            parse_var("CHARADES_SUBWORD_MIN_LENGTH")?.unwrap_or(defaults.subword_min_length);
        let data_dir = env::var("CHARADES_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let offline = env::var("CHARADES_OFFLINE").unwrap_or_else(|_| "0".to_string()) == "1";

        let llm = LlmConfig {
            base_url: env::var("CHARADES_LLM_BASE_URL").unwrap_or(defaults.llm.base_url),
            api_key: env::var("CHARADES_LLM_API_KEY").ok(),
            model: env::var("CHARADES_LLM_MODEL").unwrap_or(defaults.llm.model),
            timeout_secs: parse_var("CHARADES_LLM_TIMEOUT_SECS")?.unwrap_or(defaults.llm.timeout_secs),
        };

        Ok(Self {
            num_components,
            max_history_size,
            tracking_limit,
            subword_min_length,
            data_dir,
            offline,
            llm,
        })
    }

    pub fn with_num_components(mut self, n: usize) -> Self {
        self.num_components = clamp_components(n);
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }

    pub fn key_value_path(&self) -> PathBuf {
        self.data_dir.join(KEY_VALUE_FILENAME)
    }
}

fn clamp_components(n: usize) -> usize {
    let clamped = n.clamp(MIN_COMPONENTS, MAX_COMPONENTS);
    if clamped != n {
        warn!("num_components {} out of range, using {}", n, clamped);
    }
    clamped
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid value for {}: {:?}", name, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CharadesConfig::default();
        assert_eq!(config.num_components, 3);
        assert_eq!(config.tracking_limit, 1000);
        assert_eq!(config.subword_min_length, 3);
        assert!(config.max_history_size.is_none());
        assert!(!config.llm.is_configured());
        assert!(config.database_path().ends_with("words.db"));
    }

    #[test]
    fn test_num_components_clamped() {
        assert_eq!(CharadesConfig::default().with_num_components(9).num_components, 5);
        assert_eq!(CharadesConfig::default().with_num_components(0).num_components, 2);
        assert_eq!(CharadesConfig::default().with_num_components(4).num_components, 4);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("CHARADES_TEST_PARSE_GARBAGE", "many");
        assert!(parse_var::<usize>("CHARADES_TEST_PARSE_GARBAGE").is_err());
        env::set_var("CHARADES_TEST_PARSE_GARBAGE", " 12 ");
        assert_eq!(parse_var::<usize>("CHARADES_TEST_PARSE_GARBAGE").unwrap(), Some(12));
        env::remove_var("CHARADES_TEST_PARSE_GARBAGE");
        assert_eq!(parse_var::<usize>("CHARADES_TEST_PARSE_GARBAGE").unwrap(), None);
    }

    #[test]
    fn test_blank_api_key_is_unconfigured() {
        let llm = LlmConfig {
            api_key: Some("  ".to_string()),
            ..LlmConfig::default()
        };
        assert!(!llm.is_configured());
    }
}
