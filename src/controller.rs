use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::error::Result;
use crate::models::{DetailView, Document};
use crate::selection::{SelectionChange, SelectionModel, SubscriptionId};
use crate::service::DocumentSource;

/// Results of background fetches, applied on the owning thread.
pub enum ControllerEvent {
    Loaded { seq: u64, result: Result<Vec<Document>> },
    Details { id: String, result: Result<Option<Document>> },
}

/// Owns the document list and the selection scoped to it.
///
/// Fetches run on `runtime`; their results are queued and only touch state
/// when [`try_apply_pending`](Self::try_apply_pending) or
/// [`next_event`](Self::next_event) is called.
pub struct DocumentListController {
    source: Arc<dyn DocumentSource>,
    runtime: Handle,
    documents: Vec<Document>,
    selection: SelectionModel<Document>,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
    load_seq: u64,
    pending_load: Option<CancellationToken>,
    details: Option<DetailView>,
    last_error: Option<String>,
}

impl DocumentListController {
    pub fn new(source: Arc<dyn DocumentSource>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            documents: Vec::new(),
            selection: SelectionModel::new(),
            events_tx,
            events_rx,
            load_seq: 0,
            pending_load: None,
            details: None,
            last_error: None,
        }
    }

    /// Clears the selection now and fetches the list in the background.
    ///
    /// A load still in flight is cancelled; only the latest request's
    /// response is ever applied.
    pub fn load_documents(&mut self) {
        self.selection.clear();
        if let Some(previous) = self.pending_load.take() {
            previous.cancel();
        }

        self.load_seq += 1;
        let seq = self.load_seq;
        let token = CancellationToken::new();
        self.pending_load = Some(token.clone());

        let source = self.source.clone();
        let tx = self.events_tx.clone();
        info!(seq, "loading documents");
        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!(seq, "document load cancelled"),
                result = source.fetch_all() => {
                    let _ = tx.send(ControllerEvent::Loaded { seq, result });
                }
            }
        });
    }

    pub fn request_details(&mut self, id: &str) {
        self.details = Some(DetailView::Loading(id.to_string()));
        let source = self.source.clone();
        let tx = self.events_tx.clone();
        let id = id.to_string();
        self.runtime.spawn(async move {
            let result = source.fetch_by_id(&id).await;
            let _ = tx.send(ControllerEvent::Details { id, result });
        });
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    /// Applies every event that has already arrived. Never blocks.
    pub fn try_apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next background result and applies it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Loaded { seq, result } => {
                if seq != self.load_seq {
                    debug!(seq, latest = self.load_seq, "discarding stale document list");
                    return;
                }
                self.pending_load = None;
                match result {
                    Ok(documents) => {
                        info!(count = documents.len(), "documents loaded");
                        self.documents = documents;
                        self.last_error = None;
                        // Rows picked while the load was pending must still exist.
                        let documents = &self.documents;
                        self.selection.retain(|doc| documents.contains(doc));
                    }
                    Err(err) => {
                        warn!(error = %err, "document load failed; keeping previous list");
                        self.last_error = Some(err.to_string());
                    }
                }
            }
            ControllerEvent::Details { id, result } => {
                let wanted = matches!(&self.details, Some(DetailView::Loading(pending)) if *pending == id);
                if !wanted {
                    debug!(%id, "ignoring detail lookup for closed popup");
                    return;
                }
                self.details = match result {
                    Ok(Some(doc)) => Some(DetailView::Found(doc)),
                    Ok(None) => Some(DetailView::NotFound(id)),
                    Err(err) => {
                        warn!(%id, error = %err, "document lookup failed");
                        self.last_error = Some(err.to_string());
                        None
                    }
                };
            }
        }
    }

    /// True when every listed document is selected; vacuously true for an empty list.
    pub fn is_all_selected(&self) -> bool {
        self.selection.len() == self.documents.len()
    }

    pub fn master_toggle(&mut self) {
        if self.is_all_selected() {
            self.selection.clear();
        } else {
            self.selection.select_all(&self.documents);
        }
    }

    /// Removes the selected documents locally. Returns how many were removed.
    pub fn bulk_delete(&mut self) -> usize {
        let ids: HashSet<&str> = self.selection.selected().iter().map(|d| d.id.as_str()).collect();
        let before = self.documents.len();
        self.documents.retain(|d| !ids.contains(d.id.as_str()));
        let removed = before - self.documents.len();
        self.selection.clear();
        info!(removed, "bulk delete");
        removed
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(doc) = self.documents.iter().find(|d| d.id == id) {
            self.selection.toggle(doc.clone());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.selected().iter().any(|d| d.id == id)
    }

    pub fn subscribe_selection(
        &mut self,
        listener: impl FnMut(&SelectionChange<Document>) + 'static,
    ) -> SubscriptionId {
        self.selection.subscribe(listener)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn selection(&self) -> &SelectionModel<Document> {
        &self.selection
    }

    pub fn selected_documents(&self) -> &[Document] {
        self.selection.selected()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn details(&self) -> Option<&DetailView> {
        self.details.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::service::{MockDocumentService, demo_documents};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn controller() -> DocumentListController {
        let source = MockDocumentService::with_demo_data(Duration::ZERO, Duration::ZERO);
        DocumentListController::new(Arc::new(source), Handle::current())
    }

    async fn loaded() -> DocumentListController {
        let mut ctrl = controller();
        ctrl.load_documents();
        ctrl.next_event().await;
        ctrl
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    /// Answers each call with the next scripted (delay, result) pair.
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Vec<(Duration, std::result::Result<Vec<Document>, String>)>,
    }

    #[async_trait]
    impl DocumentSource for ScriptedSource {
        async fn fetch_all(&self) -> Result<Vec<Document>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = &self.script[call];
            tokio::time::sleep(*delay).await;
            result.clone().map_err(SourceError::Unavailable)
        }

        async fn fetch_by_id(&self, _id: &str) -> Result<Option<Document>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn empty_list_counts_as_all_selected() {
        let ctrl = controller();
        assert!(ctrl.documents().is_empty());
        assert!(ctrl.is_all_selected());
    }

    #[tokio::test]
    async fn list_is_not_swapped_synchronously() {
        let mut ctrl = controller();
        ctrl.load_documents();
        assert!(ctrl.is_loading());
        assert!(ctrl.documents().is_empty());

        ctrl.next_event().await;
        assert!(!ctrl.is_loading());
        assert_eq!(ids(ctrl.documents()), vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn master_toggle_selects_all_then_clears() {
        let mut ctrl = loaded().await;

        ctrl.master_toggle();
        assert!(ctrl.is_all_selected());
        assert_eq!(ids(ctrl.selected_documents()), vec!["1", "2", "3", "4", "5"]);

        ctrl.master_toggle();
        assert!(ctrl.selected_documents().is_empty());
    }

    #[tokio::test]
    async fn master_toggle_fills_partial_selection() {
        let mut ctrl = loaded().await;
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        ctrl.subscribe_selection(move |change| sink.borrow_mut().push(change.clone()));

        ctrl.toggle("4");
        ctrl.master_toggle();

        assert!(ctrl.is_all_selected());
        assert_eq!(ids(ctrl.selected_documents()), vec!["4", "1", "2", "3", "5"]);
        assert_eq!(ids(&events.borrow()[1].added), vec!["1", "2", "3", "5"]);
    }

    #[tokio::test]
    async fn bulk_delete_removes_selected_ids() {
        let mut ctrl = loaded().await;
        ctrl.toggle("1");
        ctrl.toggle("3");

        assert_eq!(ctrl.bulk_delete(), 2);
        assert_eq!(ids(ctrl.documents()), vec!["2", "4", "5"]);
        assert!(ctrl.selected_documents().is_empty());
    }

    #[tokio::test]
    async fn toggle_ignores_unknown_ids() {
        let mut ctrl = loaded().await;
        ctrl.toggle("99");
        assert!(ctrl.selection().is_empty());
        ctrl.toggle("2");
        assert!(ctrl.is_selected("2"));
        ctrl.toggle("2");
        assert!(!ctrl.is_selected("2"));
    }

    #[tokio::test]
    async fn reload_clears_selection_immediately() {
        let mut ctrl = loaded().await;
        ctrl.toggle("1");
        ctrl.toggle("2");

        ctrl.load_documents();
        ctrl.load_documents();
        assert!(ctrl.selected_documents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_load_never_lands() {
        let mut first = demo_documents();
        first.truncate(2);
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            script: vec![
                (Duration::from_millis(1000), Ok(first)),
                (Duration::from_millis(10), Ok(demo_documents())),
            ],
        };
        let mut ctrl = DocumentListController::new(Arc::new(source), Handle::current());

        ctrl.load_documents();
        tokio::task::yield_now().await;
        ctrl.load_documents();
        ctrl.next_event().await;
        assert_eq!(ctrl.documents().len(), 5);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(ctrl.try_apply_pending(), 0);
        assert_eq!(ctrl.documents().len(), 5);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let mut ctrl = loaded().await;
        ctrl.load_documents();
        ctrl.apply(ControllerEvent::Loaded { seq: 1, result: Ok(Vec::new()) });
        assert_eq!(ctrl.documents().len(), 5);
        assert!(ctrl.is_loading());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            script: vec![
                (Duration::ZERO, Ok(demo_documents())),
                (Duration::ZERO, Err("timeout".to_string())),
            ],
        };
        let mut ctrl = DocumentListController::new(Arc::new(source), Handle::current());
        ctrl.load_documents();
        ctrl.next_event().await;

        ctrl.load_documents();
        ctrl.next_event().await;

        assert_eq!(ctrl.documents().len(), 5);
        assert_eq!(ctrl.last_error(), Some("document source unavailable: timeout"));
        assert!(!ctrl.is_loading());
    }

    #[tokio::test]
    async fn selection_made_during_reload_is_pruned() {
        let mut ctrl = loaded().await;
        ctrl.load_documents();
        ctrl.toggle("2");
        ctrl.apply(ControllerEvent::Loaded {
            seq: 2,
            result: Ok(demo_documents().into_iter().filter(|d| d.id != "2").collect()),
        });
        assert!(ctrl.selected_documents().is_empty());
    }

    #[tokio::test]
    async fn details_resolve_found_and_missing() {
        let mut ctrl = loaded().await;

        ctrl.request_details("5");
        assert!(matches!(ctrl.details(), Some(DetailView::Loading(id)) if id == "5"));
        ctrl.next_event().await;
        assert!(matches!(ctrl.details(), Some(DetailView::Found(doc)) if doc.name == "Cover_Image.png"));

        ctrl.request_details("nope");
        ctrl.next_event().await;
        assert!(matches!(ctrl.details(), Some(DetailView::NotFound(id)) if id == "nope"));
    }

    #[tokio::test]
    async fn closed_detail_popup_ignores_late_result() {
        let mut ctrl = loaded().await;
        ctrl.request_details("1");
        ctrl.close_details();
        ctrl.next_event().await;
        assert!(ctrl.details().is_none());
    }
}
