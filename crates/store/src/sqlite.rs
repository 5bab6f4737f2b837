//! SQLite-backed inventory store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use haulplan_core::{InventoryData, InventoryId, SavedInventoryData};

use crate::error::{StoreError, StoreResult};
use crate::InventoryStore;

const COLLECTION: &str = "inventories";

/// Durable store over a single-row SQLite collection table.
///
/// The whole collection lives in one row and is read-modify-written as one
/// JSON blob per operation, so records stay an atomic unit and a corrupt
/// blob can be discarded wholesale.
#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::open(format!("creating {}: {e}", parent.display())))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        // One connection: the collection is read-modify-written sequentially
        // with no concurrent writers assumed.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::open(format!("{}: {e}", path.display())))?;

        Self::with_pool(pool).await
    }

    /// Fresh in-memory store (tests/dev).
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::open(e.to_string()))?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name       TEXT NOT NULL PRIMARY KEY,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::open(format!("creating collections table: {e}")))?;

        Ok(Self { pool })
    }

    /// Default on-disk location: `{data_dir}/haulplan/store.db`.
    pub fn default_path() -> Option<PathBuf> {
        let mut dir = dirs::data_dir().or_else(|| {
            dirs::home_dir().map(|mut home| {
                home.push(".local");
                home.push("share");
                home
            })
        })?;
        dir.push("haulplan");
        dir.push("store.db");
        Some(dir)
    }

    async fn read_collection(&self) -> StoreResult<Vec<SavedInventoryData>> {
        let row = sqlx::query("SELECT data FROM collections WHERE name = ?1")
            .bind(COLLECTION)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::read(e.to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let blob: String = row
            .try_get("data")
            .map_err(|e| StoreError::read(e.to_string()))?;

        match serde_json::from_str(&blob) {
            Ok(records) => Ok(records),
            Err(err) => {
                // Self-heal: unreadable content is discarded, not surfaced.
                tracing::warn!(error = %err, "discarding corrupt inventory collection");
                let _ = sqlx::query("DELETE FROM collections WHERE name = ?1")
                    .bind(COLLECTION)
                    .execute(&self.pool)
                    .await;
                Ok(Vec::new())
            }
        }
    }

    async fn write_collection(&self, records: &[SavedInventoryData]) -> StoreResult<()> {
        let blob = serde_json::to_string(records).map_err(|e| StoreError::write(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO collections (name, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name)
            DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(COLLECTION)
        .bind(&blob)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::write(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn list(&self) -> StoreResult<Vec<SavedInventoryData>> {
        let mut records = self.read_collection().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn save(&self, data: InventoryData) -> StoreResult<SavedInventoryData> {
        let mut records = self.read_collection().await?;
        let record = SavedInventoryData {
            id: InventoryId::new(),
            created_at: Utc::now(),
            data,
        };
        records.insert(0, record.clone());
        self.write_collection(&records).await?;

        tracing::debug!(id = %record.id, "inventory saved");
        Ok(record)
    }

    async fn delete_by_id(&self, id: InventoryId) {
        let records = match self.read_collection().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "delete skipped: collection unreadable");
                return;
            }
        };

        let before = records.len();
        let remaining: Vec<_> = records.into_iter().filter(|r| r.id != id).collect();
        if remaining.len() == before {
            return;
        }

        if let Err(err) = self.write_collection(&remaining).await {
            tracing::warn!(id = %id, error = %err, "delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulplan_core::InventoryItem;

    fn sample_data(name: &str) -> InventoryData {
        InventoryData {
            inventory: vec![InventoryItem {
                name: name.to_string(),
                count: 1,
                description: format!("{name} in good condition"),
                tags: vec!["furniture".to_string()],
                estimated_size: "approx. 35 cubic feet".to_string(),
            }],
            transcript: format!("There is a {name} by the wall."),
            total_estimated_size: "35 cubic feet".to_string(),
        }
    }

    #[tokio::test]
    async fn save_enriches_and_list_returns_newest_first() {
        let store = SqliteInventoryStore::in_memory().await.unwrap();

        let first = store.save(sample_data("desk")).await.unwrap();
        let second = store.save(sample_data("armchair")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(listed[1].data, sample_data("desk"));
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test]
    async fn delete_round_trip_restores_the_pre_save_set() {
        let store = SqliteInventoryStore::in_memory().await.unwrap();
        let baseline = store.list().await.unwrap();

        let saved = store.save(sample_data("bookshelf")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), baseline.len() + 1);

        store.delete_by_id(saved.id).await;
        assert_eq!(store.list().await.unwrap(), baseline);
    }

    #[tokio::test]
    async fn deleting_a_missing_id_is_a_no_op() {
        let store = SqliteInventoryStore::in_memory().await.unwrap();
        let saved = store.save(sample_data("dresser")).await.unwrap();

        store.delete_by_id(InventoryId::new()).await;

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
    }

    #[tokio::test]
    async fn corrupt_blob_is_discarded_on_read() {
        let store = SqliteInventoryStore::in_memory().await.unwrap();
        store.save(sample_data("sofa")).await.unwrap();

        sqlx::query("UPDATE collections SET data = ?1 WHERE name = ?2")
            .bind("{not valid json")
            .bind(COLLECTION)
            .execute(&store.pool)
            .await
            .unwrap();

        assert_eq!(store.list().await.unwrap(), Vec::new());

        // The store keeps working after healing.
        let saved = store.save(sample_data("lamp")).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![saved]);
    }
}
