//! User actions routed through the state machine.

use haulplan_core::InventoryId;

/// A user-triggered event.
///
/// Events that make no sense in the current view are ignored (logged at
/// debug, no transition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Start camera capture (from idle).
    StartCapture,
    /// Tear down the capture view without keeping anything.
    CancelCapture,
    /// Complete the recording and derive a description from it.
    FinishCapture,
    /// Re-attempt device acquisition after a capture failure.
    RetryCapture,
    /// Replace the description draft.
    EditDescription(String),
    /// Submit the current draft for generation.
    SubmitDescription,
    /// Re-run the generation that just failed.
    RetryGeneration,
    /// Open the saved-inventories list.
    ViewSaved,
    /// Persist the active inventory.
    SaveInventory,
    /// Leave the success view.
    Dismiss,
    /// Load a saved record as the active inventory.
    SelectRecord(InventoryId),
    /// Remove a saved record.
    DeleteRecord(InventoryId),
    /// Full reset back to idle.
    StartNew,
}
