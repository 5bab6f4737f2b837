//! View sum type and the data it carries.

use haulplan_core::{Description, InventoryData, InventoryId, SavedInventoryData};
use haulplan_media::CaptureSession;

/// Inline message attached to a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Local input validation failed (no state transition happened).
    Validation(String),
    /// A captured video could not be turned into a description.
    CaptureProcessing(String),
    /// Persisting the active inventory failed.
    Persistence(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(msg)
            | Notice::CaptureProcessing(msg)
            | Notice::Persistence(msg) => msg,
        }
    }
}

/// Where the active inventory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    /// Freshly generated, not yet persisted.
    Generated,
    /// Loaded from the store.
    Stored(InventoryId),
}

/// The inventory currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveInventory {
    pub data: InventoryData,
    pub source: ActiveSource,
}

/// Capture view sub-state.
#[derive(Debug)]
pub enum CapturePhase {
    /// Device acquired, recording in progress.
    Recording(CaptureSession),
    /// Acquisition failed; retry or go back.
    Failed(String),
}

/// The application's current mode. Exactly one is active at a time; an
/// active inventory exists only in `Success`.
#[derive(Debug)]
pub enum AppView {
    Idle {
        /// Description draft (typed, or derived from a captured video).
        description: String,
        notice: Option<Notice>,
    },
    CapturingVideo {
        phase: CapturePhase,
    },
    Processing {
        description: Description,
    },
    Success {
        active: ActiveInventory,
        notice: Option<Notice>,
    },
    Error {
        message: String,
        /// The submission that failed, kept for retry.
        description: Description,
    },
    ListInventories {
        records: Vec<SavedInventoryData>,
    },
}

impl AppView {
    /// Fresh idle view: empty draft, no notice (the full reset).
    pub fn idle() -> Self {
        AppView::Idle {
            description: String::new(),
            notice: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppView::Idle { .. } => "idle",
            AppView::CapturingVideo { .. } => "capturing_video",
            AppView::Processing { .. } => "processing",
            AppView::Success { .. } => "success",
            AppView::Error { .. } => "error",
            AppView::ListInventories { .. } => "list_inventories",
        }
    }

    pub fn active_inventory(&self) -> Option<&ActiveInventory> {
        match self {
            AppView::Success { active, .. } => Some(active),
            _ => None,
        }
    }
}
