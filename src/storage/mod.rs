//! Storage Module
//!
//! Durable persistence for the word registry. Backends are interchangeable
//! behind [`WordStore`]; the registry picks the first one that opens.

pub mod kv;
pub mod memory;
pub mod migration;
pub mod sqlite;

pub use kv::{JsonWordStore, KeyValueStore};
pub use memory::InMemoryWordStore;
pub use migration::{migrate_legacy, MigrationOutcome, LEGACY_WORDS_KEY, MIGRATION_FLAG_KEY};
pub use sqlite::SqliteWordStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::registry::RegistryEntry;

/// Persistence seam for used words
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Open or create the underlying storage. Errors mean the backend is unusable.
    async fn init(&self) -> Result<()>;

    /// Every persisted entry, oldest first
    async fn get_all(&self) -> Result<Vec<RegistryEntry>>;

    /// Insert an entry. Returns `false` when the word is already stored.
    async fn put(&self, entry: &RegistryEntry) -> Result<bool>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;
}
