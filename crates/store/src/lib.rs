//! `haulplan-store`
//!
//! **Responsibility:** sole owner of the durable inventory collection.
//!
//! The persistence boundary is one named collection, read and written as a
//! single JSON blob per operation. A blob that fails to decode on read is
//! discarded (the store self-heals); only write failures surface to callers.
//! No other component reads or writes the collection directly.

pub mod error;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use haulplan_core::{InventoryData, InventoryId, SavedInventoryData};

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;

/// Keyed persistence of saved inventories.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// All saved records, sorted by `created_at` descending.
    async fn list(&self) -> StoreResult<Vec<SavedInventoryData>>;

    /// Assign a fresh id and timestamp, persist, and return the enriched
    /// record. Write failures surface to the caller; a save never silently
    /// succeeds.
    async fn save(&self, data: InventoryData) -> StoreResult<SavedInventoryData>;

    /// Remove a record if present. Idempotent: an absent id is a no-op.
    /// Best-effort: failures are logged, not escalated.
    async fn delete_by_id(&self, id: InventoryId);
}

#[async_trait]
impl<S: InventoryStore + ?Sized> InventoryStore for Arc<S> {
    async fn list(&self) -> StoreResult<Vec<SavedInventoryData>> {
        (**self).list().await
    }

    async fn save(&self, data: InventoryData) -> StoreResult<SavedInventoryData> {
        (**self).save(data).await
    }

    async fn delete_by_id(&self, id: InventoryId) {
        (**self).delete_by_id(id).await
    }
}
