//! Simple key-value persistence over a single JSON file
//!
//! `KeyValueStore` is the lowest-common-denominator store: opaque JSON values
//! under string keys. `JsonWordStore` keeps the word history as one list in
//! it and is the fallback when the indexed store cannot be opened. The same
//! file also holds legacy history and the migration flag.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use super::WordStore;
use crate::registry::RegistryEntry;

const WORDS_KEY: &str = "used_words";

pub struct KeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn save(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.insert(key.to_string(), value);
        self.save(&map).await
    }

    /// Apply `f` to the current value of `key` under the lock and store the result.
    pub async fn update<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<Value>) -> Result<(Value, T)> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        let (value, out) = f(map.remove(key))?;
        map.insert(key.to_string(), value);
        self.save(&map).await?;
        Ok(out)
    }
}

/// Word history stored as a single list inside a [`KeyValueStore`]
pub struct JsonWordStore {
    kv: Arc<KeyValueStore>,
    max_entries: Option<usize>,
}

impl JsonWordStore {
    pub fn new(kv: Arc<KeyValueStore>, max_entries: Option<usize>) -> Self {
        Self { kv, max_entries }
    }

    fn decode(value: Option<Value>) -> Result<Vec<RegistryEntry>> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(v) => serde_json::from_value(v).context("Failed to decode stored word list"),
        }
    }
}

#[async_trait]
impl WordStore for JsonWordStore {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn init(&self) -> Result<()> {
        // A corrupt file or an unreadable path makes the backend unusable.
        let existing = self.kv.get(WORDS_KEY).await?;
        Self::decode(existing)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<RegistryEntry>> {
        Self::decode(self.kv.get(WORDS_KEY).await?)
    }

    async fn put(&self, entry: &RegistryEntry) -> Result<bool> {
        let entry = entry.clone();
        let max_entries = self.max_entries;

        self.kv
            .update(WORDS_KEY, move |current| {
                let mut entries = Self::decode(current)?;
                if entries.iter().any(|e| e.word == entry.word) {
                    return Ok((serde_json::to_value(&entries)?, false));
                }
                entries.push(entry);
                if let Some(max) = max_entries {
                    let excess = entries.len().saturating_sub(max);
                    entries.drain(..excess);
                }
                Ok((serde_json::to_value(&entries)?, true))
            })
            .await
    }

    async fn clear(&self) -> Result<()> {
        self.kv.set(WORDS_KEY, Value::Array(Vec::new())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NormalizedWord;
    use serde_json::json;
    use tempfile::tempdir;

    fn entry(word: &str) -> RegistryEntry {
        RegistryEntry::new(NormalizedWord::new(word).unwrap())
    }

    #[tokio::test]
    async fn test_kv_get_set_update() -> Result<()> {
        let dir = tempdir()?;
        let kv = KeyValueStore::new(dir.path().join("storage.json"));

        assert!(kv.get("missing").await?.is_none());
        kv.set("flag", json!(true)).await?;
        assert_eq!(kv.get("flag").await?, Some(json!(true)));

        let previous = kv.update("flag", |old| Ok((json!(false), old))).await?;
        assert_eq!(previous, Some(json!(true)));
        assert_eq!(kv.get("flag").await?, Some(json!(false)));
        Ok(())
    }

    #[tokio::test]
    async fn test_json_store_dedup_and_eviction() -> Result<()> {
        let dir = tempdir()?;
        let kv = Arc::new(KeyValueStore::new(dir.path().join("storage.json")));
        let store = JsonWordStore::new(kv, Some(2));
        store.init().await?;

        assert!(store.put(&entry("tiger")).await?);
        assert!(!store.put(&entry("tiger")).await?);
        assert!(store.put(&entry("pizza")).await?);
        assert!(store.put(&entry("lamp")).await?);

        let words: Vec<String> = store
            .get_all()
            .await?
            .into_iter()
            .map(|e| e.word.into_string())
            .collect();
        assert_eq!(words, vec!["pizza", "lamp"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_json_store_rejects_corrupt_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json")?;

        let store = JsonWordStore::new(Arc::new(KeyValueStore::new(path)), None);
        assert!(store.init().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_json_store_clear() -> Result<()> {
        let dir = tempdir()?;
        let kv = Arc::new(KeyValueStore::new(dir.path().join("storage.json")));
        let store = JsonWordStore::new(kv, None);
        store.put(&entry("tiger")).await?;
        store.clear().await?;
        assert!(store.get_all().await?.is_empty());
        Ok(())
    }
}
