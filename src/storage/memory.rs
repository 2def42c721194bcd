//! Process-local store used when no durable backend opens

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::WordStore;
use crate::registry::RegistryEntry;

#[derive(Default)]
pub struct InMemoryWordStore {
    entries: RwLock<Vec<RegistryEntry>>,
}

impl InMemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WordStore for InMemoryWordStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<RegistryEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn put(&self, entry: &RegistryEntry) -> Result<bool> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.word == entry.word) {
            return Ok(false);
        }
        entries.push(entry.clone());
        Ok(true)
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NormalizedWord;

    #[test]
    fn test_memory_store_roundtrip() {
        tokio_test::block_on(async {
            let store = InMemoryWordStore::new();
            let entry = RegistryEntry::new(NormalizedWord::new("tiger").unwrap());

            assert!(store.put(&entry).await.unwrap());
            assert!(!store.put(&entry).await.unwrap());
            assert_eq!(store.get_all().await.unwrap().len(), 1);

            store.clear().await.unwrap();
            assert!(store.get_all().await.unwrap().is_empty());
        });
    }
}
