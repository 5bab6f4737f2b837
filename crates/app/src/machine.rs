//! The application controller: events in, view transitions out.

use haulplan_ai::GenerationService;
use haulplan_core::Description;
use haulplan_media::{MediaGateway, VideoDescriber};
use haulplan_store::InventoryStore;

use crate::event::AppEvent;
use crate::view::{ActiveInventory, ActiveSource, AppView, CapturePhase, Notice};

/// Shown when an empty/whitespace-only draft is submitted.
pub const EMPTY_DESCRIPTION_MESSAGE: &str =
    "Please enter a description of your items before submitting.";

const PROCESSING_FAILURE_MESSAGE: &str =
    "We couldn't process that video. Please try again or type a description instead.";

const SAVE_FAILURE_MESSAGE: &str = "Saving the inventory failed. Please try again.";

const CAPTURE_FILENAME: &str = "capture.webm";

/// The application state machine.
///
/// An explicit owned object over the four boundaries — no ambient globals.
/// Event handling takes `&mut self` and awaits every collaborator call to
/// completion, so at most one processing-class operation is ever in flight.
pub struct App<G, D, M, S> {
    generator: G,
    describer: D,
    media: M,
    store: S,
    view: AppView,
}

impl<G, D, M, S> App<G, D, M, S>
where
    G: GenerationService,
    D: VideoDescriber,
    M: MediaGateway,
    S: InventoryStore,
{
    pub fn new(generator: G, describer: D, media: M, store: S) -> Self {
        Self {
            generator,
            describer,
            media,
            store,
            view: AppView::idle(),
        }
    }

    pub fn view(&self) -> &AppView {
        &self.view
    }

    /// Route one event through the machine and return the resulting view.
    pub async fn handle(&mut self, event: AppEvent) -> &AppView {
        let view = core::mem::replace(&mut self.view, AppView::idle());
        self.view = self.transition(view, event).await;
        tracing::debug!(view = self.view.name(), "transition complete");
        &self.view
    }

    async fn transition(&mut self, view: AppView, event: AppEvent) -> AppView {
        match (view, event) {
            // Idle: draft editing, submission, capture entry, list entry.
            (AppView::Idle { .. }, AppEvent::EditDescription(text)) => AppView::Idle {
                description: text,
                notice: None,
            },
            (AppView::Idle { description, .. }, AppEvent::SubmitDescription) => {
                match Description::new(description.clone()) {
                    Ok(submitted) => self.run_generation(submitted).await,
                    // Rejected locally: no transition, inline message.
                    Err(_) => AppView::Idle {
                        description,
                        notice: Some(Notice::Validation(EMPTY_DESCRIPTION_MESSAGE.to_string())),
                    },
                }
            }
            (AppView::Idle { .. }, AppEvent::StartCapture) => self.open_capture().await,
            (AppView::Idle { .. }, AppEvent::ViewSaved) => self.load_list().await,

            // CapturingVideo: dropping the phase releases the device.
            (AppView::CapturingVideo { phase }, AppEvent::CancelCapture) => {
                drop(phase);
                AppView::idle()
            }
            (
                AppView::CapturingVideo {
                    phase: CapturePhase::Recording(session),
                },
                AppEvent::FinishCapture,
            ) => {
                let blob = session.finish(CAPTURE_FILENAME);
                match self.describer.describe(&blob).await {
                    Ok(text) => AppView::Idle {
                        description: text,
                        notice: None,
                    },
                    Err(err) => {
                        tracing::warn!(error = %err, "video description failed");
                        AppView::Idle {
                            description: String::new(),
                            notice: Some(Notice::CaptureProcessing(
                                PROCESSING_FAILURE_MESSAGE.to_string(),
                            )),
                        }
                    }
                }
            }
            (
                AppView::CapturingVideo {
                    phase: CapturePhase::Failed(_),
                },
                AppEvent::RetryCapture,
            ) => self.open_capture().await,

            // Error: retry the failed submission.
            (AppView::Error { description, .. }, AppEvent::RetryGeneration) => {
                self.run_generation(description).await
            }

            // Success: persist, dismiss, or delete the viewed record.
            (AppView::Success { active, notice }, AppEvent::SaveInventory) => {
                match active.source {
                    ActiveSource::Generated => match self.store.save(active.data.clone()).await {
                        Ok(record) => {
                            tracing::info!(id = %record.id, "inventory saved");
                            self.load_list().await
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "saving inventory failed");
                            AppView::Success {
                                active,
                                notice: Some(Notice::Persistence(
                                    SAVE_FAILURE_MESSAGE.to_string(),
                                )),
                            }
                        }
                    },
                    // Already persisted; nothing to do.
                    ActiveSource::Stored(_) => AppView::Success { active, notice },
                }
            }
            (AppView::Success { active, .. }, AppEvent::Dismiss) => match active.source {
                ActiveSource::Stored(_) => self.load_list().await,
                ActiveSource::Generated => AppView::idle(),
            },
            (AppView::Success { active, notice }, AppEvent::DeleteRecord(id)) => {
                match active.source {
                    ActiveSource::Stored(stored_id) if stored_id == id => {
                        self.store.delete_by_id(id).await;
                        self.load_list().await
                    }
                    _ => AppView::Success { active, notice },
                }
            }

            // ListInventories: selection re-enters success, deletion stays.
            (AppView::ListInventories { records }, AppEvent::SelectRecord(id)) => {
                match records.iter().find(|r| r.id == id) {
                    Some(record) => AppView::Success {
                        active: ActiveInventory {
                            data: record.data.clone(),
                            source: ActiveSource::Stored(id),
                        },
                        notice: None,
                    },
                    // The list may have raced with a delete; nothing to show.
                    None => AppView::ListInventories { records },
                }
            }
            (AppView::ListInventories { .. }, AppEvent::DeleteRecord(id)) => {
                self.store.delete_by_id(id).await;
                self.load_list().await
            }

            // Anywhere: full reset. Dropping the old view releases any
            // capture session it held.
            (_, AppEvent::StartNew) => AppView::idle(),

            (view, event) => {
                tracing::debug!(view = view.name(), ?event, "event ignored in current view");
                view
            }
        }
    }

    /// `Processing` is the held view while the generation call is awaited;
    /// it always resolves to either `Success` or `Error`.
    async fn run_generation(&mut self, description: Description) -> AppView {
        self.view = AppView::Processing {
            description: description.clone(),
        };
        match self.generator.generate(&description).await {
            Ok(data) => AppView::Success {
                active: ActiveInventory {
                    data,
                    source: ActiveSource::Generated,
                },
                notice: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "generation failed");
                AppView::Error {
                    message: err.user_message().to_string(),
                    description,
                }
            }
        }
    }

    async fn open_capture(&self) -> AppView {
        match self.media.open().await {
            Ok(session) => AppView::CapturingVideo {
                phase: CapturePhase::Recording(session),
            },
            Err(err) => {
                tracing::warn!(error = %err, "capture acquisition failed");
                AppView::CapturingVideo {
                    phase: CapturePhase::Failed(err.to_string()),
                }
            }
        }
    }

    async fn load_list(&self) -> AppView {
        match self.store.list().await {
            Ok(records) => AppView::ListInventories { records },
            Err(err) => {
                tracing::warn!(error = %err, "listing saved inventories failed");
                AppView::ListInventories {
                    records: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use haulplan_ai::GenerationError;
    use haulplan_core::{InventoryData, InventoryItem};
    use haulplan_media::{CaptureError, CaptureSession, DescribeError, MediaStream, VideoBlob};
    use haulplan_store::{InMemoryInventoryStore, StoreError, StoreResult};
    use haulplan_core::{InventoryId, SavedInventoryData};

    struct FakeGeneration {
        responses: Mutex<VecDeque<Result<InventoryData, GenerationError>>>,
        calls: AtomicUsize,
    }

    impl FakeGeneration {
        fn with(responses: Vec<Result<InventoryData, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn succeeding(data: InventoryData) -> Arc<Self> {
            Self::with(vec![Ok(data)])
        }

        fn failing() -> Arc<Self> {
            Self::with(vec![Err(GenerationError::backend("connection refused"))])
        }

        fn unused() -> Arc<Self> {
            Self::with(Vec::new())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationService for FakeGeneration {
        async fn generate(
            &self,
            _description: &Description,
        ) -> Result<InventoryData, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected generation call")
        }
    }

    #[derive(Clone)]
    struct FakeDescriber(Result<String, DescribeError>);

    #[async_trait]
    impl VideoDescriber for FakeDescriber {
        async fn describe(&self, _video: &VideoBlob) -> Result<String, DescribeError> {
            self.0.clone()
        }
    }

    fn describer() -> FakeDescriber {
        FakeDescriber(Ok("a garage with two bicycles".to_string()))
    }

    struct CountingStream {
        releases: Arc<AtomicUsize>,
    }

    impl MediaStream for CountingStream {
        fn stop_all_tracks(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }

        fn take_recording(&mut self) -> Vec<u8> {
            b"clip".to_vec()
        }
    }

    struct CountingGateway {
        releases: Arc<AtomicUsize>,
    }

    impl CountingGateway {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let releases = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    releases: Arc::clone(&releases),
                },
                releases,
            )
        }
    }

    #[async_trait]
    impl MediaGateway for CountingGateway {
        async fn open(&self) -> Result<CaptureSession, CaptureError> {
            Ok(CaptureSession::new(Box::new(CountingStream {
                releases: Arc::clone(&self.releases),
            })))
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl MediaGateway for FailingGateway {
        async fn open(&self) -> Result<CaptureSession, CaptureError> {
            Err(CaptureError::device_unavailable("camera already in use"))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl InventoryStore for FailingStore {
        async fn list(&self) -> StoreResult<Vec<SavedInventoryData>> {
            Ok(Vec::new())
        }

        async fn save(&self, _data: InventoryData) -> StoreResult<SavedInventoryData> {
            Err(StoreError::write("disk full"))
        }

        async fn delete_by_id(&self, _id: InventoryId) {}
    }

    fn bedroom_inventory() -> InventoryData {
        InventoryData {
            inventory: vec![
                InventoryItem {
                    name: "Queen bed".to_string(),
                    count: 1,
                    description: "Bed frame with mattress".to_string(),
                    tags: vec!["bedroom".to_string()],
                    estimated_size: "approx. 65 cubic feet".to_string(),
                },
                InventoryItem {
                    name: "Nightstand".to_string(),
                    count: 2,
                    description: "Matching nightstands".to_string(),
                    tags: vec!["bedroom".to_string()],
                    estimated_size: "8 cubic feet".to_string(),
                },
            ],
            transcript: "I can see a queen bed flanked by two nightstands.".to_string(),
            total_estimated_size: "81 cubic feet".to_string(),
        }
    }

    async fn submit(app: &mut App<impl GenerationService, impl VideoDescriber, impl MediaGateway, impl InventoryStore>, text: &str) {
        app.handle(AppEvent::EditDescription(text.to_string())).await;
        app.handle(AppEvent::SubmitDescription).await;
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_locally_without_a_transition() {
        let generator = FakeGeneration::unused();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            Arc::clone(&generator),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        for draft in ["", "   ", " \t\r\n "] {
            submit(&mut app, draft).await;
            match app.view() {
                AppView::Idle {
                    notice: Some(Notice::Validation(msg)),
                    ..
                } => assert_eq!(msg, EMPTY_DESCRIPTION_MESSAGE),
                other => panic!("expected idle with validation notice, got {other:?}"),
            }
        }
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn successful_generation_lands_in_success_with_the_result_active() {
        let data = bedroom_inventory();
        let generator = FakeGeneration::succeeding(data.clone());
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            Arc::clone(&generator),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        submit(&mut app, "a queen bed and two nightstands").await;

        match app.view() {
            AppView::Success { active, notice: None } => {
                assert_eq!(active.source, ActiveSource::Generated);
                assert_eq!(active.data, data);
                assert_eq!(active.data.inventory.len(), 2);
                assert_eq!(active.data.inventory[0].estimated_size, "approx. 65 cubic feet");
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn failed_generation_lands_in_error_with_no_active_inventory() {
        let generator = FakeGeneration::failing();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            Arc::clone(&generator),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        submit(&mut app, "a queen bed and two nightstands").await;

        match app.view() {
            AppView::Error { message, .. } => assert!(!message.is_empty()),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(app.view().active_inventory().is_none());
    }

    #[tokio::test]
    async fn retry_reruns_the_failed_submission() {
        let data = bedroom_inventory();
        let generator = FakeGeneration::with(vec![
            Err(GenerationError::backend("connection refused")),
            Ok(data.clone()),
        ]);
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            Arc::clone(&generator),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        submit(&mut app, "a queen bed and two nightstands").await;
        assert!(matches!(app.view(), AppView::Error { .. }));

        app.handle(AppEvent::RetryGeneration).await;
        match app.view() {
            AppView::Success { active, .. } => assert_eq!(active.data, data),
            other => panic!("expected success after retry, got {other:?}"),
        }
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn cancelling_capture_returns_to_idle_and_releases_the_device_once() {
        let (gateway, releases) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        app.handle(AppEvent::StartCapture).await;
        assert!(matches!(
            app.view(),
            AppView::CapturingVideo {
                phase: CapturePhase::Recording(_)
            }
        ));

        app.handle(AppEvent::CancelCapture).await;
        assert!(matches!(
            app.view(),
            AppView::Idle {
                notice: None,
                ..
            }
        ));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn finishing_capture_fills_the_draft_with_the_derived_description() {
        let (gateway, releases) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        app.handle(AppEvent::StartCapture).await;
        app.handle(AppEvent::FinishCapture).await;

        match app.view() {
            AppView::Idle {
                description,
                notice: None,
            } => assert_eq!(description, "a garage with two bicycles"),
            other => panic!("expected idle with derived draft, got {other:?}"),
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn describe_failure_returns_to_idle_with_a_processing_notice() {
        let (gateway, releases) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            FakeDescriber(Err(DescribeError::failed("no frames"))),
            gateway,
            InMemoryInventoryStore::new(),
        );

        app.handle(AppEvent::StartCapture).await;
        app.handle(AppEvent::FinishCapture).await;

        match app.view() {
            AppView::Idle {
                description,
                notice: Some(Notice::CaptureProcessing(msg)),
            } => {
                assert!(description.is_empty());
                assert!(!msg.is_empty());
            }
            other => panic!("expected idle with processing notice, got {other:?}"),
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn capture_acquisition_failure_offers_retry_and_back() {
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            FailingGateway,
            InMemoryInventoryStore::new(),
        );

        app.handle(AppEvent::StartCapture).await;
        assert!(matches!(
            app.view(),
            AppView::CapturingVideo {
                phase: CapturePhase::Failed(_)
            }
        ));

        app.handle(AppEvent::RetryCapture).await;
        assert!(matches!(
            app.view(),
            AppView::CapturingVideo {
                phase: CapturePhase::Failed(_)
            }
        ));

        app.handle(AppEvent::CancelCapture).await;
        assert!(matches!(app.view(), AppView::Idle { .. }));
    }

    #[tokio::test]
    async fn saving_a_generated_inventory_moves_to_the_refreshed_list() {
        let data = bedroom_inventory();
        let store = Arc::new(InMemoryInventoryStore::new());
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::succeeding(data.clone()),
            describer(),
            gateway,
            Arc::clone(&store),
        );

        submit(&mut app, "a queen bed and two nightstands").await;
        app.handle(AppEvent::SaveInventory).await;

        match app.view() {
            AppView::ListInventories { records } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].data, data);
            }
            other => panic!("expected list after save, got {other:?}"),
        }
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn a_failed_save_keeps_the_active_inventory_and_reports_it() {
        let data = bedroom_inventory();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::succeeding(data.clone()),
            describer(),
            gateway,
            FailingStore,
        );

        submit(&mut app, "a queen bed and two nightstands").await;
        app.handle(AppEvent::SaveInventory).await;

        match app.view() {
            AppView::Success {
                active,
                notice: Some(Notice::Persistence(msg)),
            } => {
                assert_eq!(active.data, data);
                assert!(!msg.is_empty());
            }
            other => panic!("expected success with persistence notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dismissing_a_generated_inventory_returns_to_idle() {
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::succeeding(bedroom_inventory()),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        submit(&mut app, "a queen bed and two nightstands").await;
        app.handle(AppEvent::Dismiss).await;

        assert!(matches!(
            app.view(),
            AppView::Idle {
                notice: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn stored_records_can_be_viewed_dismissed_and_deleted() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let saved = store.save(bedroom_inventory()).await.unwrap();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            Arc::clone(&store),
        );

        app.handle(AppEvent::ViewSaved).await;
        match app.view() {
            AppView::ListInventories { records } => assert_eq!(records.len(), 1),
            other => panic!("expected list, got {other:?}"),
        }

        app.handle(AppEvent::SelectRecord(saved.id)).await;
        match app.view() {
            AppView::Success { active, .. } => {
                assert_eq!(active.source, ActiveSource::Stored(saved.id));
                assert_eq!(active.data, saved.data);
            }
            other => panic!("expected success with stored record, got {other:?}"),
        }

        // Dismissing a stored record goes back to the list, not to idle.
        app.handle(AppEvent::Dismiss).await;
        assert!(matches!(app.view(), AppView::ListInventories { .. }));

        // Deleting the record while viewing it clears it and refreshes.
        app.handle(AppEvent::SelectRecord(saved.id)).await;
        app.handle(AppEvent::DeleteRecord(saved.id)).await;
        match app.view() {
            AppView::ListInventories { records } => assert!(records.is_empty()),
            other => panic!("expected empty list, got {other:?}"),
        }
        assert!(app.view().active_inventory().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_from_the_list_changes_nothing() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let saved = store.save(bedroom_inventory()).await.unwrap();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            Arc::clone(&store),
        );

        app.handle(AppEvent::ViewSaved).await;
        app.handle(AppEvent::DeleteRecord(InventoryId::new())).await;

        match app.view() {
            AppView::ListInventories { records } => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].id, saved.id);
            }
            other => panic!("expected unchanged list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn selecting_an_unknown_id_stays_on_the_list() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.save(bedroom_inventory()).await.unwrap();
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            Arc::clone(&store),
        );

        app.handle(AppEvent::ViewSaved).await;
        app.handle(AppEvent::SelectRecord(InventoryId::new())).await;
        assert!(matches!(app.view(), AppView::ListInventories { .. }));
    }

    #[tokio::test]
    async fn start_new_resets_from_any_view() {
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::failing(),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        submit(&mut app, "a wardrobe").await;
        assert!(matches!(app.view(), AppView::Error { .. }));

        app.handle(AppEvent::StartNew).await;
        match app.view() {
            AppView::Idle {
                description,
                notice: None,
            } => assert!(description.is_empty()),
            other => panic!("expected fresh idle, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_that_make_no_sense_in_the_current_view_are_ignored() {
        let (gateway, _) = CountingGateway::new();
        let mut app = App::new(
            FakeGeneration::unused(),
            describer(),
            gateway,
            InMemoryInventoryStore::new(),
        );

        app.handle(AppEvent::EditDescription("a desk".to_string()))
            .await;
        app.handle(AppEvent::SaveInventory).await;
        app.handle(AppEvent::FinishCapture).await;

        match app.view() {
            AppView::Idle { description, .. } => assert_eq!(description, "a desk"),
            other => panic!("expected idle with preserved draft, got {other:?}"),
        }
    }
}
