//! Video-to-description adapter.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

use crate::capture::VideoBlob;

/// Video description failure (generic rejection).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescribeError {
    #[error("video description failed: {0}")]
    Failed(String),
}

impl DescribeError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Turns a captured/uploaded video into a natural-language description.
///
/// May suspend for a caller-invisible duration; resolves or rejects on the
/// collaborator's own schedule (no timeout imposed here).
#[async_trait]
pub trait VideoDescriber: Send + Sync {
    async fn describe(&self, video: &VideoBlob) -> Result<String, DescribeError>;
}

const CANNED_DESCRIPTIONS: &[&str] = &[
    "A living room with a three-seat sofa, a coffee table, a large TV on a media \
     console, two floor lamps, and a bookshelf full of books.",
    "A bedroom with a queen bed, two nightstands, a six-drawer dresser, and a \
     wardrobe packed with clothes.",
    "A kitchen with a refrigerator, a microwave, a small dining table with four \
     chairs, and roughly ten boxes of dishes and pantry items.",
    "A home office with a desk, an office chair, two monitors, a filing cabinet, \
     and a bookshelf.",
    "A garage with two bicycles, a workbench, a lawn mower, and a dozen storage \
     bins of tools and holiday decorations.",
];

/// Simulated describer: canned description, randomized 3–6 s delay.
///
/// Substitute a real transcription/vision service behind [`VideoDescriber`];
/// this implementation mirrors the external latency without leaving the
/// process.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedVideoDescriber {
    /// Fixed delay override; `None` keeps the randomized window.
    delay: Option<Duration>,
}

impl SimulatedVideoDescriber {
    pub fn new() -> Self {
        Self { delay: None }
    }

    /// Fixed delay, for tests and demos that should not wait.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }

    fn pick_delay(&self) -> Duration {
        match self.delay {
            Some(delay) => delay,
            None => Duration::from_millis(rand::rng().random_range(3_000..=6_000)),
        }
    }

    fn pick_description(&self) -> &'static str {
        let idx = rand::rng().random_range(0..CANNED_DESCRIPTIONS.len());
        CANNED_DESCRIPTIONS[idx]
    }
}

impl Default for SimulatedVideoDescriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoDescriber for SimulatedVideoDescriber {
    async fn describe(&self, video: &VideoBlob) -> Result<String, DescribeError> {
        tracing::debug!(filename = %video.filename, bytes = video.bytes.len(), "describing video");
        tokio::time::sleep(self.pick_delay()).await;
        Ok(self.pick_description().to_string())
    }
}
