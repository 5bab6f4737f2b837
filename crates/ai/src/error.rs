//! Generation failure taxonomy.

use thiserror::Error;

/// Failure while producing an inventory from a description.
///
/// Every variant collapses to the same generic user-facing message; the
/// detail is for logs, not for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The service call itself failed (network, non-success status).
    #[error("generation service call failed: {0}")]
    Backend(String),

    /// The response body was not valid structured data.
    #[error("generation response was not parseable: {0}")]
    Malformed(String),

    /// The parsed response was missing required fields or had the wrong
    /// shape (`inventory`, `transcript`, `totalEstimatedSize`).
    #[error("generation response violated the output schema: {0}")]
    Schema(String),
}

impl GenerationError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Single user-facing message for all generation failures.
    pub fn user_message(&self) -> &'static str {
        "Could not generate an inventory from that description. Please try again."
    }
}
