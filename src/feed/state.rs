//! Pure feed state and its transitions.
//!
//! Nothing here performs I/O. [`FeedState::begin_load`] hands out a
//! [`LoadRequest`] ticket, and the same ticket must be presented to
//! [`FeedState::complete_load`] together with the page result. The epoch in
//! the ticket is what lets a completion for an abandoned selection be
//! recognised and dropped.

use crate::catalog::{CatalogError, CatalogItem, FeedSelection};
use std::collections::HashSet;

/// Ticket for one in-flight page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Selection epoch at the time the load started.
    pub epoch: u64,
    pub selection: FeedSelection,
    /// Zero-based page index.
    pub page: u32,
}

/// What [`FeedState::complete_load`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page appended. `skipped` counts items dropped as duplicates.
    Applied { added: usize, skipped: usize },
    /// Load failed; items and page counter untouched.
    Failed,
    /// Completion does not belong to the current load and was ignored.
    Stale,
}

/// The visible part of the item list, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Index of the first visible item.
    pub offset: usize,
    /// Number of visible rows.
    pub height: usize,
}

/// Accumulated items for one selection plus the loading flag.
#[derive(Debug, Clone)]
pub struct FeedState {
    selection: FeedSelection,
    items: Vec<CatalogItem>,
    /// Ids already in `items`.
    seen: HashSet<String>,
    next_page: u32,
    is_loading: bool,
    epoch: u64,
    last_error: Option<String>,
}

impl FeedState {
    pub fn new(selection: FeedSelection) -> Self {
        Self {
            selection,
            items: Vec::new(),
            seen: HashSet::new(),
            next_page: 0,
            is_loading: false,
            epoch: 0,
            last_error: None,
        }
    }

    pub fn selection(&self) -> FeedSelection {
        self.selection
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Drop everything and start over for `selection`.
    ///
    /// Bumps the epoch so any load still in flight is recognised as stale
    /// when it completes.
    pub fn reset(&mut self, selection: FeedSelection) {
        self.selection = selection;
        self.items.clear();
        self.seen.clear();
        self.next_page = 0;
        self.is_loading = false;
        self.last_error = None;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Start loading the next page, unless a load is already in flight.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.is_loading {
            return None;
        }
        self.is_loading = true;
        Some(LoadRequest {
            epoch: self.epoch,
            selection: self.selection,
            page: self.next_page,
        })
    }

    /// Apply the result of the load described by `request`.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<CatalogItem>, CatalogError>,
    ) -> LoadOutcome {
        if request.epoch != self.epoch || !self.is_loading || request.page != self.next_page {
            return LoadOutcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(page) => {
                let before = self.items.len();
                let total = page.len();
                for item in page {
                    if self.seen.insert(item.id.clone()) {
                        self.items.push(item);
                    }
                }
                let added = self.items.len() - before;
                self.next_page += 1;
                self.last_error = None;
                LoadOutcome::Applied {
                    added,
                    skipped: total - added,
                }
            }
            Err(e) => {
                self.last_error = Some(e.user_message());
                LoadOutcome::Failed
            }
        }
    }

    /// True when the last visible row is within `margin` rows of the end of
    /// the list, i.e. the user has scrolled to the bottom.
    pub fn reached_bottom(&self, viewport: Viewport, margin: usize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last_visible = viewport.offset + viewport.height.max(1);
        last_visible + margin >= self.items.len()
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FeedSelection::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentType, Genre, SimulatedSource, PAGE_SIZE};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn action() -> FeedSelection {
        FeedSelection::new(ContentType::Movie, Genre::Action)
    }

    fn comedy_shows() -> FeedSelection {
        FeedSelection::new(ContentType::Show, Genre::Comedy)
    }

    fn page_for(request: &LoadRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(SimulatedSource::page(request.selection, request.page))
    }

    #[test]
    fn reset_clears_items_and_page() {
        let mut state = FeedState::new(action());
        let req = state.begin_load().unwrap();
        state.complete_load(&req, page_for(&req));
        assert_eq!(state.items().len(), PAGE_SIZE);

        state.reset(comedy_shows());
        assert!(state.items().is_empty());
        assert_eq!(state.next_page(), 0);
        assert!(!state.is_loading());
        assert_eq!(state.selection(), comedy_shows());
    }

    #[test]
    fn begin_load_is_exclusive() {
        let mut state = FeedState::new(action());
        let first = state.begin_load();
        assert!(first.is_some());
        assert!(state.is_loading());
        assert_eq!(state.begin_load(), None);
        assert_eq!(state.begin_load(), None);
    }

    #[test]
    fn completion_appends_and_advances() {
        let mut state = FeedState::new(action());
        let req = state.begin_load().unwrap();
        assert_eq!(req.page, 0);
        let outcome = state.complete_load(&req, page_for(&req));
        assert_eq!(
            outcome,
            LoadOutcome::Applied {
                added: PAGE_SIZE,
                skipped: 0
            }
        );
        assert_eq!(state.next_page(), 1);
        assert!(!state.is_loading());

        let req = state.begin_load().unwrap();
        assert_eq!(req.page, 1);
        state.complete_load(&req, page_for(&req));
        assert_eq!(state.items().len(), 2 * PAGE_SIZE);
        assert_eq!(state.items()[PAGE_SIZE].title, "Movie Action 21");
    }

    #[test]
    fn completion_from_old_epoch_is_ignored() {
        let mut state = FeedState::new(action());
        let old = state.begin_load().unwrap();

        state.reset(comedy_shows());
        let current = state.begin_load().unwrap();

        assert_eq!(state.complete_load(&old, page_for(&old)), LoadOutcome::Stale);
        assert!(state.items().is_empty());
        assert_eq!(state.next_page(), 0);
        assert!(state.is_loading(), "current load still in flight");

        state.complete_load(&current, page_for(&current));
        assert!(state.items().iter().all(|i| i.id.starts_with("show-Comedy")));
    }

    #[test]
    fn completion_for_wrong_page_is_ignored() {
        let mut state = FeedState::new(action());
        let mut req = state.begin_load().unwrap();
        req.page = 4;
        assert_eq!(state.complete_load(&req, page_for(&req)), LoadOutcome::Stale);
        assert_eq!(state.next_page(), 0);
    }

    #[test]
    fn completion_without_begin_is_ignored() {
        let mut state = FeedState::new(action());
        let req = LoadRequest {
            epoch: state.epoch(),
            selection: action(),
            page: 0,
        };
        assert_eq!(state.complete_load(&req, page_for(&req)), LoadOutcome::Stale);
        assert!(state.items().is_empty());
    }

    #[test]
    fn failure_keeps_page_and_records_error() {
        let mut state = FeedState::new(action());
        let req = state.begin_load().unwrap();
        state.complete_load(&req, page_for(&req));

        let req = state.begin_load().unwrap();
        let outcome = state.complete_load(&req, Err(CatalogError::HttpStatus(503)));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(state.items().len(), PAGE_SIZE);
        assert_eq!(state.next_page(), 1);
        assert!(!state.is_loading());
        assert!(state.last_error().unwrap().contains("503"));

        // Retrying asks for the same page again and clears the error.
        let retry = state.begin_load().unwrap();
        assert_eq!(retry.page, 1);
        state.complete_load(&retry, page_for(&retry));
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut state = FeedState::new(action());
        let req = state.begin_load().unwrap();
        state.complete_load(&req, page_for(&req));

        // A remote source can return overlapping pages when rankings shift.
        let req = state.begin_load().unwrap();
        let mut overlapping = SimulatedSource::page(action(), 0);
        overlapping.truncate(5);
        overlapping.extend(SimulatedSource::page(action(), 1).into_iter().take(3));
        let outcome = state.complete_load(&req, Ok(overlapping));
        assert_eq!(outcome, LoadOutcome::Applied { added: 3, skipped: 5 });
        assert_eq!(state.items().len(), PAGE_SIZE + 3);
    }

    #[test]
    fn bottom_detection_uses_viewport_and_margin() {
        let mut state = FeedState::new(action());
        assert!(!state.reached_bottom(Viewport { offset: 0, height: 10 }, 0));

        let req = state.begin_load().unwrap();
        state.complete_load(&req, page_for(&req));

        assert!(!state.reached_bottom(Viewport { offset: 0, height: 10 }, 0));
        assert!(state.reached_bottom(Viewport { offset: 10, height: 10 }, 0));
        assert!(!state.reached_bottom(Viewport { offset: 7, height: 10 }, 2));
        assert!(state.reached_bottom(Viewport { offset: 8, height: 10 }, 2));
        assert!(state.reached_bottom(Viewport { offset: 0, height: 40 }, 0));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Reset(bool),
        Begin,
        /// Complete the n-th outstanding ticket (mod count), ok or failed.
        Complete(usize, bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => any::<bool>().prop_map(Op::Reset),
            3 => Just(Op::Begin),
            3 => (any::<usize>(), any::<bool>()).prop_map(|(n, ok)| Op::Complete(n, ok)),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_interleaving(ops in proptest::collection::vec(op(), 1..60)) {
            let mut state = FeedState::new(action());
            let mut outstanding: Vec<LoadRequest> = Vec::new();
            let mut successes_this_epoch = 0usize;

            for op in ops {
                match op {
                    Op::Reset(shows) => {
                        state.reset(if shows { comedy_shows() } else { action() });
                        successes_this_epoch = 0;
                        prop_assert!(state.items().is_empty());
                        prop_assert_eq!(state.next_page(), 0);
                    }
                    Op::Begin => {
                        let was_loading = state.is_loading();
                        match state.begin_load() {
                            Some(req) => {
                                prop_assert!(!was_loading);
                                outstanding.push(req);
                            }
                            None => prop_assert!(was_loading),
                        }
                    }
                    Op::Complete(n, ok) => {
                        if outstanding.is_empty() {
                            continue;
                        }
                        let req = outstanding.remove(n % outstanding.len());
                        let before_len = state.items().len();
                        let before_page = state.next_page();
                        let result = if ok { page_for(&req) } else { Err(CatalogError::HttpStatus(500)) };
                        let outcome = state.complete_load(&req, result);
                        if req.epoch != state.epoch() {
                            prop_assert_eq!(outcome, LoadOutcome::Stale);
                            prop_assert_eq!(state.items().len(), before_len);
                            prop_assert_eq!(state.next_page(), before_page);
                        }
                        if let LoadOutcome::Applied { .. } = outcome {
                            successes_this_epoch += 1;
                        }
                        prop_assert!(state.items().len() >= before_len);
                    }
                }

                // At most one ticket for the current epoch is ever outstanding.
                let current = outstanding.iter().filter(|r| r.epoch == state.epoch()).count();
                prop_assert!(current <= 1);
                prop_assert_eq!(current == 1, state.is_loading());

                prop_assert_eq!(state.items().len(), successes_this_epoch * PAGE_SIZE);
                prop_assert_eq!(state.next_page() as usize, successes_this_epoch);
                let ids: HashSet<&str> = state.items().iter().map(|i| i.id.as_str()).collect();
                prop_assert_eq!(ids.len(), state.items().len());
            }
        }
    }
}
