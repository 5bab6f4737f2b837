//! `haulplan-ai`
//!
//! **Responsibility:** boundary to the external generative service.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It builds the generation request (description + reference-volume
//!   grounding table).
//! - It validates service output against the fixed wire schema and applies
//!   mandatory size normalization.
//! - It never mutates domain state and never persists anything.

pub mod backend;
pub mod client;
pub mod error;
pub mod schema;

pub use backend::{CannedGenerationBackend, GenerationBackend, HttpGenerationBackend};
pub use client::{GenerationClient, GenerationService};
pub use error::GenerationError;
pub use schema::{GenerationRequest, ReferenceVolume, REFERENCE_VOLUMES};
