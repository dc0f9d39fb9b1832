//! Trending list shown on the landing screen.

use crate::catalog::{CatalogError, CatalogItem};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LandingStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Fetch failed; the list stays empty.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct LandingState {
    items: Vec<CatalogItem>,
    status: LandingStatus,
}

impl LandingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn status(&self) -> &LandingStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LandingStatus::Loading
    }

    /// Mark a fetch as started. Returns false if one is already running.
    pub fn begin_fetch(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.status = LandingStatus::Loading;
        true
    }

    /// Store the outcome of the trending fetch.
    ///
    /// Errors never propagate: the list is emptied and the message kept for
    /// the empty-state line.
    pub fn complete_fetch(&mut self, result: Result<Vec<CatalogItem>, CatalogError>) {
        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "Trending list loaded");
                self.items = items;
                self.status = LandingStatus::Loaded;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load trending list");
                self.items.clear();
                self.status = LandingStatus::Failed(e.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FeedSelection, SimulatedSource};

    #[test]
    fn fetch_cannot_overlap() {
        let mut state = LandingState::new();
        assert_eq!(state.status(), &LandingStatus::Idle);
        assert!(state.begin_fetch());
        assert!(!state.begin_fetch());
        assert!(state.is_loading());
    }

    #[test]
    fn success_stores_items() {
        let mut state = LandingState::new();
        state.begin_fetch();
        state.complete_fetch(Ok(SimulatedSource::page(FeedSelection::default(), 0)));
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.status(), &LandingStatus::Loaded);
    }

    #[test]
    fn failure_empties_list_and_keeps_message() {
        let mut state = LandingState::new();
        state.begin_fetch();
        state.complete_fetch(Ok(SimulatedSource::page(FeedSelection::default(), 0)));

        // A manual reload that fails drops the previous list.
        assert!(state.begin_fetch());
        state.complete_fetch(Err(CatalogError::HttpStatus(500)));
        assert!(state.items().is_empty());
        match state.status() {
            LandingStatus::Failed(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("press r to retry"));
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(state.begin_fetch(), "reload allowed after failure");
    }

    #[test]
    fn missing_key_is_not_marked_retryable() {
        let mut state = LandingState::new();
        state.begin_fetch();
        state.complete_fetch(Err(CatalogError::MissingApiKey));
        assert_eq!(
            state.status(),
            &LandingStatus::Failed("TMDB API key not configured (set TMDB_API_KEY)".to_string())
        );
    }
}
