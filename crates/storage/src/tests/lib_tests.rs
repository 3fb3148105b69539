use super::*;

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    store.health_check().await.expect("health check");
}

#[tokio::test]
async fn load_returns_none_before_first_save() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    assert_eq!(store.load_draft().await.expect("load"), None);
}

#[tokio::test]
async fn saves_and_reloads_draft() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    let draft = SelectionDraft {
        amount: Some("250".to_string()),
        phone: "51234567".to_string(),
    };
    store.save_draft(&draft).await.expect("save");
    assert_eq!(store.load_draft().await.expect("load"), Some(draft));
}

#[tokio::test]
async fn save_overwrites_previous_draft() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    store
        .save_draft(&SelectionDraft {
            amount: Some("100".to_string()),
            phone: String::new(),
        })
        .await
        .expect("first save");
    let newer = SelectionDraft {
        amount: Some("500".to_string()),
        phone: "53551234".to_string(),
    };
    store.save_draft(&newer).await.expect("second save");
    assert_eq!(store.load_draft().await.expect("load"), Some(newer));
}

#[tokio::test]
async fn clear_removes_persisted_draft() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    store
        .save_draft(&SelectionDraft {
            amount: Some("100".to_string()),
            phone: "51234567".to_string(),
        })
        .await
        .expect("save");
    store.clear_draft().await.expect("clear");
    assert_eq!(store.load_draft().await.expect("load"), None);
}

#[tokio::test]
async fn clear_is_a_noop_when_nothing_persisted() {
    let store = DraftStore::new("sqlite::memory:").await.expect("db");
    store.clear_draft().await.expect("clear");
    assert_eq!(store.load_draft().await.expect("load"), None);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("topup_draft_store_test_{suffix}"));
    let db_path = temp_root.join("nested").join("wizard.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let store = DraftStore::new(&database_url).await.expect("db");
    drop(store);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
