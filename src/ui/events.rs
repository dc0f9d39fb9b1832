//! Application event handling.
//!
//! Applies background task completions to the app state.

use crate::app::{App, AppEvent};
use crate::feed::LoadOutcome;
use tokio::sync::mpsc;

/// Apply one completed background task.
pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::TrendingLoaded { result } => {
            app.apply_trending(result);
        }
        AppEvent::PageLoaded { request, result } => {
            if let LoadOutcome::Applied { added: 0, .. } = app.apply_page(request, result) {
                tracing::debug!(page = request.page, "Feed page added no new titles");
            }
        }
        AppEvent::LoginCompleted => {
            app.complete_login(event_tx);
        }
    }
}
