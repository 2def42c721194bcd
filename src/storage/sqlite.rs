//! Indexed word store backed by SQLite
//!
//! The preferred backend. One row per normalized word with a UNIQUE
//! constraint, so racing inserts collapse to a single row.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

use super::WordStore;
use crate::registry::{NormalizedWord, RegistryEntry};

#[derive(Debug, Clone)]
pub struct SqliteWordStore {
    db_path: PathBuf,
    max_entries: Option<usize>,
}

impl SqliteWordStore {
    pub fn new(db_path: impl AsRef<Path>, max_entries: Option<usize>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            max_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn evict_oldest(conn: &Connection, max_entries: usize) -> Result<usize> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM used_words", [], |row| row.get(0))?;
        let excess = count - max_entries as i64;
        if excess <= 0 {
            return Ok(0);
        }

        let removed = conn.execute(
            "DELETE FROM used_words WHERE id IN (SELECT id FROM used_words ORDER BY id ASC LIMIT ?1)",
            params![excess],
        )?;
        debug!("Evicted {} oldest words from history (limit {})", removed, max_entries);
        Ok(removed)
    }
}

#[async_trait]
impl WordStore for SqliteWordStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn init(&self) -> Result<()> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let conn = Connection::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            conn.execute(
                r#"
                CREATE TABLE IF NOT EXISTS used_words (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    word TEXT NOT NULL UNIQUE,
                    inserted_at TEXT NOT NULL
                );
                "#,
                [],
            )?;
            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_used_words_inserted_at ON used_words(inserted_at);",
                [],
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .await?
    }

    async fn get_all(&self) -> Result<Vec<RegistryEntry>> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let mut stmt = conn.prepare("SELECT word, inserted_at FROM used_words ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (word, inserted_at) = row?;
                let Some(word) = NormalizedWord::new(&word) else {
                    continue;
                };
                let inserted_at = DateTime::parse_from_rfc3339(&inserted_at)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());
                entries.push(RegistryEntry { word, inserted_at });
            }
            Ok::<_, anyhow::Error>(entries)
        })
        .await?
    }

    async fn put(&self, entry: &RegistryEntry) -> Result<bool> {
        let path = self.db_path.clone();
        let word = entry.word.as_str().to_string();
        let inserted_at = entry.inserted_at.to_rfc3339();
        let max_entries = self.max_entries;

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO used_words (word, inserted_at) VALUES (?1, ?2)",
                params![&word, &inserted_at],
            )?;

            if inserted > 0 {
                if let Some(max) = max_entries {
                    Self::evict_oldest(&conn, max)?;
                }
            }
            Ok::<_, anyhow::Error>(inserted > 0)
        })
        .await?
    }

    async fn clear(&self) -> Result<()> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            conn.execute("DELETE FROM used_words", [])?;
            Ok::<_, anyhow::Error>(())
        })
        .await?
    }
}
