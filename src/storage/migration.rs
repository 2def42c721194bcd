//! One-time import of legacy word history
//!
//! Older installs kept a flat list of used words under a single key of the
//! key-value store. It is copied into the active backend once; a flag in the
//! same store records completion so the copy never reruns.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use super::{KeyValueStore, WordStore};
use crate::registry::{NormalizedWord, RegistryEntry};

pub const LEGACY_WORDS_KEY: &str = "usedWords";
pub const MIGRATION_FLAG_KEY: &str = "wordHistoryMigrated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The flag was already set
    AlreadyMigrated,
    /// Migration ran; `copied` words were new to the target
    Migrated { copied: usize },
}

pub async fn migrate_legacy(legacy: &KeyValueStore, target: &dyn WordStore) -> Result<MigrationOutcome> {
    let done = legacy
        .get(MIGRATION_FLAG_KEY)
        .await
        .context("Failed to read migration flag")?;
    if matches!(done, Some(Value::Bool(true))) {
        return Ok(MigrationOutcome::AlreadyMigrated);
    }

    let words = legacy_words(legacy.get(LEGACY_WORDS_KEY).await?);
    let mut copied = 0;
    for word in words {
        if target.put(&RegistryEntry::new(word)).await? {
            copied += 1;
        }
    }

    legacy
        .set(MIGRATION_FLAG_KEY, Value::Bool(true))
        .await
        .context("Failed to persist migration flag")?;

    if copied > 0 {
        info!("Migrated {} legacy words into {} store", copied, target.name());
    }
    Ok(MigrationOutcome::Migrated { copied })
}

/// Legacy values are plain strings; anything else is skipped.
fn legacy_words(value: Option<Value>) -> Vec<NormalizedWord> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => NormalizedWord::new(s),
                other => {
                    warn!("Skipping non-string legacy entry: {}", other);
                    None
                }
            })
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!("Legacy word history has unexpected shape: {}", other);
            Vec::new()
        }
    }
}
