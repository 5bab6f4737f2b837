//! In-memory inventory store.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use haulplan_core::{InventoryData, InventoryId, SavedInventoryData};

use crate::error::{StoreError, StoreResult};
use crate::InventoryStore;

/// In-memory store with the same contract as the durable one.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    records: RwLock<Vec<SavedInventoryData>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list(&self) -> StoreResult<Vec<SavedInventoryData>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::read("lock poisoned"))?;

        let mut listed = records.clone();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn save(&self, data: InventoryData) -> StoreResult<SavedInventoryData> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::write("lock poisoned"))?;

        let record = SavedInventoryData {
            id: InventoryId::new(),
            created_at: Utc::now(),
            data,
        };
        records.insert(0, record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: InventoryId) {
        match self.records.write() {
            Ok(mut records) => records.retain(|r| r.id != id),
            Err(_) => tracing::warn!(id = %id, "delete failed: lock poisoned"),
        }
    }
}
