//! Free-text load description (value object).

use crate::error::{DomainError, DomainResult};

/// A non-empty free-text description of a room or load.
///
/// Compared by value, immutable once constructed. Construction is the single
/// validation point: callers holding a `Description` can assume it has
/// visible content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate and wrap a description.
    ///
    /// Rejects input that is empty or whitespace-only after trimming.
    pub fn new(text: impl Into<String>) -> DomainResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation(
                "description cannot be empty or whitespace-only",
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Description {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
