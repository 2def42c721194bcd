use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

use charades::registry::SubwordPolicy;
use charades::storage::{KeyValueStore, LEGACY_WORDS_KEY, MIGRATION_FLAG_KEY};
use charades::{CharadesConfig, WordRegistry};

fn config_in(dir: &Path) -> CharadesConfig {
    CharadesConfig {
        data_dir: dir.to_path_buf(),
        ..CharadesConfig::default()
    }
}

#[tokio::test]
async fn test_history_survives_restart() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let first = WordRegistry::from_config(&config);
    assert!(first.add("Tiger").await);
    assert_eq!(first.backend_name(), Some("sqlite"));
    drop(first);

    let second = WordRegistry::from_config(&config);
    assert!(second.exists("tiger").await);
    assert!(!second.add("  TIGER ").await);
    assert_eq!(second.count().await, 1);
}

#[tokio::test]
async fn test_legacy_history_migrates_exactly_once() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let legacy = KeyValueStore::new(config.key_value_path());
    legacy
        .set(LEGACY_WORDS_KEY, json!(["Lion", "  Zebra ", 42, ""]))
        .await
        .unwrap();

    let first = WordRegistry::from_config(&config);
    assert!(first.exists("lion").await);
    assert!(first.exists("zebra").await);
    assert_eq!(first.count().await, 2);
    assert_eq!(legacy.get(MIGRATION_FLAG_KEY).await.unwrap(), Some(json!(true)));
    drop(first);

    // New legacy data after the flag is set is never imported.
    legacy.set(LEGACY_WORDS_KEY, json!(["Giraffe"])).await.unwrap();
    let second = WordRegistry::from_config(&config);
    assert!(!second.exists("giraffe").await);
    assert_eq!(second.count().await, 2);
}

#[tokio::test]
async fn test_falls_back_to_json_when_database_unusable() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    // A directory where the database file should be
    std::fs::create_dir_all(config.database_path()).unwrap();

    let registry = WordRegistry::from_config(&config);
    assert!(registry.add("red dragon").await);
    assert_eq!(registry.backend_name(), Some("json"));
    drop(registry);

    let reopened = WordRegistry::from_config(&config);
    assert!(reopened.exists("red dragon").await);
}

#[tokio::test]
async fn test_clear_is_durable() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());

    let registry = WordRegistry::from_config(&config);
    registry.add_many(["whisk", "ladle", "spatula"]).await;
    registry.clear().await.unwrap();
    assert_eq!(registry.count().await, 0);
    assert!(!registry.exists("whisk").await);
    drop(registry);

    let reopened = WordRegistry::from_config(&config);
    assert_eq!(reopened.count().await, 0);
}

#[tokio::test]
async fn test_history_bound_evicts_oldest_on_disk_only() {
    let dir = tempdir().unwrap();
    let config = CharadesConfig {
        max_history_size: Some(2),
        ..config_in(dir.path())
    };

    let registry = WordRegistry::from_config(&config);
    for word in ["first", "second", "third"] {
        assert!(registry.add(word).await);
    }
    // The running process still remembers everything it surfaced.
    assert!(registry.exists("first").await);
    drop(registry);

    let reopened = WordRegistry::from_config(&config);
    assert!(!reopened.exists("first").await);
    assert!(reopened.exists("second").await);
    assert!(reopened.exists("third").await);
}

#[tokio::test]
async fn test_concurrent_initialization_selects_one_store() {
    let dir = tempdir().unwrap();
    let registry = Arc::new(WordRegistry::from_config(&config_in(dir.path())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.initialize().await })
        })
        .collect();

    let mut stores = Vec::new();
    for handle in handles {
        stores.push(handle.await.unwrap());
    }
    assert!(stores.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[tokio::test]
async fn test_phrase_subwords_block_reuse() {
    let registry = WordRegistry::in_memory(SubwordPolicy::default());
    assert!(registry.record_phrase("golden eagle").await);

    assert!(registry.exists("eagle").await);
    assert!(registry.is_phrase_used("eagle").await);
    assert!(registry.is_phrase_used("golden retriever").await);
    // Short tokens are not tracked on their own.
    registry.record_phrase("a big hat").await;
    assert!(!registry.exists("big").await);
    assert!(!registry.is_phrase_used("big").await);
}
