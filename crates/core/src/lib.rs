//! `haulplan-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no async, no
//! infrastructure concerns): identifiers, the inventory data model,
//! description validation and volume-unit normalization.

pub mod description;
pub mod error;
pub mod id;
pub mod item;
pub mod volume;

pub use description::Description;
pub use error::{DomainError, DomainResult};
pub use id::InventoryId;
pub use item::{InventoryData, InventoryItem, SavedInventoryData};
pub use volume::{has_unit_token, normalize_size};
