//! Word Registry
//!
//! Append-only set of normalized words backed by a durable store. The
//! in-memory set is the source of truth after initialization; durable writes
//! only matter for the next process.

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

use super::word::{tokens, NormalizedWord, RegistryEntry, SubwordPolicy};
use crate::config::CharadesConfig;
use crate::error::CharadesError;
use crate::storage::{migrate_legacy, InMemoryWordStore, JsonWordStore, KeyValueStore, SqliteWordStore, WordStore};

pub struct WordRegistry {
    /// Candidate backends in order of preference
    backends: Vec<Arc<dyn WordStore>>,
    legacy: Option<Arc<KeyValueStore>>,
    policy: SubwordPolicy,
    store: OnceCell<Arc<dyn WordStore>>,
    words: RwLock<HashSet<String>>,
}

impl WordRegistry {
    pub fn new(backends: Vec<Arc<dyn WordStore>>, policy: SubwordPolicy) -> Self {
        Self {
            backends,
            legacy: None,
            policy,
            store: OnceCell::new(),
            words: RwLock::new(HashSet::new()),
        }
    }

    /// Registry with no durable storage at all
    pub fn in_memory(policy: SubwordPolicy) -> Self {
        Self::new(vec![Arc::new(InMemoryWordStore::new())], policy)
    }

    /// SQLite first, then the JSON key-value file, with the same file
    /// providing legacy history.
    pub fn from_config(config: &CharadesConfig) -> Self {
        let kv = Arc::new(KeyValueStore::new(config.key_value_path()));
        let backends: Vec<Arc<dyn WordStore>> = vec![
            Arc::new(SqliteWordStore::new(config.database_path(), config.max_history_size)),
            Arc::new(JsonWordStore::new(kv.clone(), config.max_history_size)),
        ];
        Self::new(backends, SubwordPolicy::new(config.subword_min_length)).with_legacy(kv)
    }

    pub fn with_legacy(mut self, legacy: Arc<KeyValueStore>) -> Self {
        self.legacy = Some(legacy);
        self
    }

    pub fn policy(&self) -> SubwordPolicy {
        self.policy
    }

    /// Name of the backend in use, once initialized
    pub fn backend_name(&self) -> Option<&'static str> {
        self.store.get().map(|s| s.name())
    }

    /// Open storage and load history. Safe to call repeatedly and
    /// concurrently; every caller waits for the first initialization.
    pub async fn initialize(&self) -> Arc<dyn WordStore> {
        self.store.get_or_init(|| self.open()).await.clone()
    }

    async fn open(&self) -> Arc<dyn WordStore> {
        let mut selected: Option<Arc<dyn WordStore>> = None;
        for backend in &self.backends {
            match backend.init().await {
                Ok(()) => {
                    selected = Some(backend.clone());
                    break;
                }
                Err(source) => {
                    let err = CharadesError::StorageUnavailable {
                        backend: backend.name(),
                        source,
                    };
                    warn!("{:#}", err);
                }
            }
        }

        let store = selected.unwrap_or_else(|| {
            warn!("No durable word store available; history will not survive this process");
            Arc::new(InMemoryWordStore::new())
        });

        if let Some(legacy) = &self.legacy {
            if let Err(e) = migrate_legacy(legacy, store.as_ref()).await {
                warn!("Legacy word migration failed: {:#}", e);
            }
        }

        match store.get_all().await {
            Ok(entries) => {
                let mut words = self.words.write().await;
                words.extend(entries.into_iter().map(|e| e.word.into_string()));
                info!("Word registry loaded {} words from {} store", words.len(), store.name());
            }
            Err(e) => warn!("Failed to load word history from {}: {:#}", store.name(), e),
        }

        store
    }

    pub async fn exists(&self, word: &str) -> bool {
        self.initialize().await;
        match NormalizedWord::new(word) {
            Some(word) => self.words.read().await.contains(word.as_str()),
            None => false,
        }
    }

    /// Insert a word. Returns `false` if it was already present.
    pub async fn add(&self, word: &str) -> bool {
        let store = self.initialize().await;
        let Some(word) = NormalizedWord::new(word) else {
            return false;
        };

        // Memory first: anything accepted here is visible before the durable write.
        if !self.words.write().await.insert(word.as_str().to_string()) {
            return false;
        }

        let entry = RegistryEntry::new(word);
        match store.put(&entry).await {
            Ok(true) => {}
            Ok(false) => debug!("'{}' already persisted by another writer", entry.word),
            Err(e) => warn!("Failed to persist '{}': {:#}", entry.word, e),
        }
        true
    }

    /// Add each word in turn; returns how many were new.
    pub async fn add_many<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inserted = 0;
        for word in words {
            if self.add(word.as_ref()).await {
                inserted += 1;
            }
        }
        inserted
    }

    pub async fn count(&self) -> usize {
        self.initialize().await;
        self.words.read().await.len()
    }

    /// Administrative reset of memory and durable storage
    pub async fn clear(&self) -> Result<()> {
        let store = self.initialize().await;
        self.words.write().await.clear();
        store.clear().await?;
        info!("Word registry cleared");
        Ok(())
    }

    /// True if the whole phrase or any of its significant sub-words is used.
    pub async fn is_phrase_used(&self, phrase: &str) -> bool {
        self.initialize().await;
        let Some(phrase) = NormalizedWord::new(phrase) else {
            return false;
        };

        let words = self.words.read().await;
        words.contains(phrase.as_str())
            || self
                .policy
                .significant_subwords(&phrase)
                .iter()
                .any(|w| words.contains(w.as_str()))
    }

    /// Like [`Self::is_phrase_used`], but ignores sub-words that `phrase`
    /// shares with `base`. Used for mutations of an already-used phrase.
    pub async fn is_extension_used(&self, phrase: &str, base: &str) -> bool {
        self.initialize().await;
        let (Some(phrase), Some(base)) = (NormalizedWord::new(phrase), NormalizedWord::new(base)) else {
            return false;
        };

        let base_tokens: HashSet<&str> = tokens(base.as_str()).into_iter().collect();
        let words = self.words.read().await;
        words.contains(phrase.as_str())
            || self
                .policy
                .significant_subwords(&phrase)
                .iter()
                .filter(|w| !base_tokens.contains(w.as_str()))
                .any(|w| words.contains(w.as_str()))
    }

    /// Record a phrase and its significant sub-words. Returns whether the
    /// whole phrase was new.
    pub async fn record_phrase(&self, phrase: &str) -> bool {
        let Some(normalized) = NormalizedWord::new(phrase) else {
            return false;
        };

        let inserted = self.add(normalized.as_str()).await;
        for subword in self.policy.significant_subwords(&normalized) {
            self.add(subword.as_str()).await;
        }
        inserted
    }
}
