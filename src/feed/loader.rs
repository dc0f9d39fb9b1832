//! Drives [`FeedState`] against a [`PageSource`] on background tasks.

use super::state::{FeedState, LoadOutcome, LoadRequest, Viewport};
use crate::app::AppEvent;
use crate::catalog::{CatalogError, CatalogItem, FeedSelection, PageSource};
use crate::util::catch_task_panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct FeedLoader {
    state: FeedState,
    source: Arc<dyn PageSource>,
    /// Most recently spawned fetch, aborted when the loader is dropped.
    task: Option<JoinHandle<()>>,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            state: FeedState::default(),
            source,
            task: None,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Switch to `selection`: drop all items and load its first page.
    ///
    /// A fetch still running for the old selection is left alone; its
    /// completion no longer matches the epoch and is ignored.
    pub fn set_selection(&mut self, selection: FeedSelection, tx: &mpsc::Sender<AppEvent>) {
        self.state.reset(selection);
        tracing::debug!(
            selection = %selection,
            epoch = self.state.epoch(),
            "Feed selection reset"
        );
        self.request_more(tx);
    }

    /// Start loading the next page. Returns false if a load is already running.
    pub fn request_more(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        let Some(request) = self.state.begin_load() else {
            return false;
        };

        tracing::debug!(
            source = self.source.name(),
            selection = %request.selection,
            page = request.page,
            epoch = request.epoch,
            "Loading feed page"
        );

        let source = Arc::clone(&self.source);
        let tx = tx.clone();
        self.task = Some(tokio::spawn(async move {
            let result = match catch_task_panic(
                source.fetch_page(request.selection, request.page),
            )
            .await
            {
                Ok(result) => result,
                Err(panic_msg) => {
                    tracing::error!(error = %panic_msg, "Page fetch panicked");
                    Err(CatalogError::Internal(panic_msg))
                }
            };
            if let Err(e) = tx.send(AppEvent::PageLoaded { request, result }).await {
                tracing::warn!(error = %e, event = "PageLoaded", "Channel send failed (receiver dropped)");
            }
        }));
        true
    }

    /// Load more once the viewport reaches the end of the list.
    ///
    /// Does nothing after a failed load; the user retries explicitly.
    pub fn load_more_if_at_bottom(
        &mut self,
        viewport: Viewport,
        margin: usize,
        tx: &mpsc::Sender<AppEvent>,
    ) -> bool {
        if self.state.last_error().is_some() || !self.state.reached_bottom(viewport, margin) {
            return false;
        }
        self.request_more(tx)
    }

    /// Re-request the page that last failed. Returns false when there is
    /// nothing to retry.
    pub fn retry(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        if self.state.last_error().is_none() {
            return false;
        }
        tracing::info!(page = self.state.next_page(), "Retrying feed page");
        self.request_more(tx)
    }

    /// Apply a completed fetch.
    pub fn apply(
        &mut self,
        request: LoadRequest,
        result: Result<Vec<CatalogItem>, CatalogError>,
    ) -> LoadOutcome {
        let outcome = self.state.complete_load(&request, result);
        match outcome {
            LoadOutcome::Applied { added, skipped } => {
                tracing::debug!(
                    selection = %request.selection,
                    page = request.page,
                    added,
                    skipped,
                    total = self.state.items().len(),
                    "Feed page applied"
                );
            }
            LoadOutcome::Failed => {
                tracing::warn!(
                    selection = %request.selection,
                    page = request.page,
                    error = self.state.last_error().unwrap_or_default(),
                    "Feed page failed"
                );
            }
            LoadOutcome::Stale => {
                tracing::debug!(
                    request_epoch = request.epoch,
                    current_epoch = self.state.epoch(),
                    page = request.page,
                    "Discarding stale feed page"
                );
            }
        }
        outcome
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}
