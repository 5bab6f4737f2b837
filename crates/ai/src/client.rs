//! Generation client: request construction, schema validation, normalization.

use async_trait::async_trait;
use serde::Deserialize;

use haulplan_core::{Description, InventoryData, InventoryItem};

use crate::backend::GenerationBackend;
use crate::error::GenerationError;
use crate::schema::GenerationRequest;

/// Seam the application depends on: description in, typed inventory out.
///
/// Implemented by [`GenerationClient`] for real transports and by
/// deterministic fakes in tests.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, description: &Description) -> Result<InventoryData, GenerationError>;
}

#[async_trait]
impl<G: GenerationService + ?Sized> GenerationService for std::sync::Arc<G> {
    async fn generate(&self, description: &Description) -> Result<InventoryData, GenerationError> {
        (**self).generate(description).await
    }
}

/// Wire shape of a service response. Every field is required; a missing one
/// is a schema violation, not a default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInventory {
    inventory: Vec<WireItem>,
    transcript: String,
    total_estimated_size: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    name: String,
    count: u32,
    description: String,
    tags: Vec<String>,
    estimated_size: String,
}

impl From<WireItem> for InventoryItem {
    fn from(item: WireItem) -> Self {
        InventoryItem {
            name: item.name,
            count: item.count,
            description: item.description,
            tags: item.tags,
            estimated_size: item.estimated_size,
        }
    }
}

/// Client over an opaque generation transport.
///
/// Validates the raw response against the fixed output schema and applies
/// mandatory size normalization. No partial results: any failure surfaces
/// as a [`GenerationError`] and nothing else.
pub struct GenerationClient<B> {
    backend: B,
}

impl<B: GenerationBackend> GenerationClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: GenerationBackend> GenerationService for GenerationClient<B> {
    async fn generate(&self, description: &Description) -> Result<InventoryData, GenerationError> {
        let request = GenerationRequest::new(description);
        let raw = self.backend.infer(&request).await?;

        let wire: WireInventory =
            serde_json::from_value(raw).map_err(|e| GenerationError::schema(e.to_string()))?;

        let mut data = InventoryData {
            inventory: wire.inventory.into_iter().map(Into::into).collect(),
            transcript: wire.transcript,
            total_estimated_size: wire.total_estimated_size,
        };
        data.normalize_sizes();

        tracing::debug!(
            items = data.inventory.len(),
            total = %data.total_estimated_size,
            "inventory generated"
        );
        Ok(data)
    }
}
