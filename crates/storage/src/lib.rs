use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::SelectionDraft;

const DRAFT_KEY: &str = "selection_draft";

/// Local key-value store for the in-progress selection draft. One serialized
/// `{amount, phone}` record lives under a single key; provider and step are
/// never persisted.
#[derive(Clone)]
pub struct DraftStore {
    pool: Pool<Sqlite>,
}

impl DraftStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(connect_options)
            .await?;
        let store = Self { pool };
        store.ensure_kv_table().await?;
        Ok(store)
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_kv_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wizard_kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure wizard_kv table exists")?;
        Ok(())
    }

    /// Upserts the single draft record. Idempotent; callers treat failures as
    /// non-fatal.
    pub async fn save_draft(&self, draft: &SelectionDraft) -> Result<()> {
        let value = serde_json::to_string(draft).context("failed to serialize selection draft")?;
        sqlx::query(
            "INSERT INTO wizard_kv (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(DRAFT_KEY)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("failed to persist selection draft")?;
        Ok(())
    }

    /// Reads the persisted draft, if any. Called once at startup.
    pub async fn load_draft(&self) -> Result<Option<SelectionDraft>> {
        let row = sqlx::query("SELECT value FROM wizard_kv WHERE key = ?")
            .bind(DRAFT_KEY)
            .fetch_optional(&self.pool)
            .await
            .context("failed to read selection draft")?;
        match row {
            Some(row) => {
                let value: String = row.try_get("value")?;
                let draft = serde_json::from_str(&value)
                    .context("stored selection draft is not valid JSON")?;
                Ok(Some(draft))
            }
            None => Ok(None),
        }
    }

    /// Drops the persisted draft once the deep link has been produced.
    pub async fn clear_draft(&self) -> Result<()> {
        sqlx::query("DELETE FROM wizard_kv WHERE key = ?")
            .bind(DRAFT_KEY)
            .execute(&self.pool)
            .await
            .context("failed to clear selection draft")?;
        Ok(())
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
