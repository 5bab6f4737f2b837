//! The inventory data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::InventoryId;
use crate::volume::normalize_size;

/// A single household item in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub name: String,
    /// Item count; the generating service is expected to return >= 0.
    pub count: u32,
    pub description: String,
    pub tags: Vec<String>,
    /// Volume estimate, unit-bearing after normalization.
    pub estimated_size: String,
}

/// A generated inventory: ordered items, a simulated transcript, and the
/// service-computed total volume estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryData {
    pub inventory: Vec<InventoryItem>,
    pub transcript: String,
    pub total_estimated_size: String,
}

impl InventoryData {
    /// Normalize every per-item size and the total (mandatory post-processing
    /// of service output; idempotent).
    pub fn normalize_sizes(&mut self) {
        for item in &mut self.inventory {
            item.estimated_size = normalize_size(&item.estimated_size);
        }
        self.total_estimated_size = normalize_size(&self.total_estimated_size);
    }
}

/// An inventory persisted to the store.
///
/// Created at save time, immutable thereafter except for deletion; owned
/// exclusively by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInventoryData {
    pub id: InventoryId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: InventoryData,
}
