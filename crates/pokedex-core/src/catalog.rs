//! Catalog page controller: one page in memory, cursor-based paging, and a
//! debounced name filter over that page.
//!
//! Fetches are split in two halves so the owner can run them on another task:
//! [`CatalogController::begin_load`] marks the controller loading and hands out
//! a [`PageRequest`] stamped with a fresh generation;
//! [`CatalogController::complete_load`] applies the result. Only the most
//! recently initiated request can change state; completions of superseded
//! requests are reported as [`LoadOutcome::Stale`] and dropped, so a slow
//! response can never overwrite a newer page.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::load_state::LoadState;
use crate::model::{CatalogEntry, CatalogPage, PageCursor};
use crate::search::{DebouncedTerm, Debouncer, SearchState, filter_entries};
use crate::source::CatalogSource;
use crate::{Config, FetchError};

/// How a requested page relates to the one currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Initial,
    Next,
    Previous,
    /// Same cursor as the held page (user-triggered retry).
    Reload,
}

/// A page fetch handed out by [`CatalogController::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub cursor: PageCursor,
    pub direction: PageDirection,
}

/// What [`CatalogController::complete_load`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page replaced the held one.
    Applied,
    /// The fetch failed; the held page is untouched.
    Failed(FetchError),
    /// A newer request was initiated since; the result was discarded.
    Stale,
}

pub struct CatalogController {
    page: Option<CatalogPage>,
    /// Cursor the held page was fetched with.
    page_cursor: Option<PageCursor>,
    page_number: u32,
    loading: bool,
    last_error: Option<FetchError>,
    generation: u64,
    search: SearchState,
    debouncer: Debouncer,
    recomputations: u64,
}

impl CatalogController {
    /// Create a controller and the receiver on which debounced search terms
    /// arrive. Feed every received term back through
    /// [`apply_debounced`](Self::apply_debounced).
    pub fn new(debounce: Duration) -> (Self, mpsc::UnboundedReceiver<DebouncedTerm>) {
        let (debouncer, rx) = Debouncer::new(debounce);
        let controller = Self {
            page: None,
            page_cursor: None,
            page_number: 1,
            loading: false,
            last_error: None,
            generation: 0,
            search: SearchState::default(),
            debouncer,
            recomputations: 0,
        };
        (controller, rx)
    }

    pub fn from_config(config: &Config) -> (Self, mpsc::UnboundedReceiver<DebouncedTerm>) {
        Self::new(config.debounce)
    }

    // ── Paging ──────────────────────────────────────────────────

    /// Start fetching the page at `cursor`. The loading flag is set before
    /// this returns.
    pub fn begin_load(&mut self, cursor: PageCursor) -> PageRequest {
        let direction = self.direction_for(&cursor);
        self.begin_load_as(cursor, direction)
    }

    fn begin_load_as(&mut self, cursor: PageCursor, direction: PageDirection) -> PageRequest {
        self.generation += 1;
        self.loading = true;
        tracing::debug!(
            generation = self.generation,
            cursor = %cursor,
            ?direction,
            "page request"
        );
        PageRequest {
            generation: self.generation,
            cursor,
            direction,
        }
    }

    /// Apply the result of `request`.
    ///
    /// On success the held page is swapped wholesale, the search is reset so
    /// the full new page is visible, and the page counter moves with the
    /// request direction. On failure nothing but the error indicator changes.
    pub fn complete_load(
        &mut self,
        request: &PageRequest,
        result: Result<CatalogPage, FetchError>,
    ) -> LoadOutcome {
        if request.generation != self.generation {
            tracing::debug!(
                generation = request.generation,
                latest = self.generation,
                "discarding superseded page response"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.page_number = match request.direction {
                    PageDirection::Initial => 1,
                    PageDirection::Next => self.page_number + 1,
                    PageDirection::Previous => self.page_number.saturating_sub(1).max(1),
                    PageDirection::Reload => self.page_number,
                };
                tracing::info!(
                    page = self.page_number,
                    entries = page.entries.len(),
                    total = page.total_count,
                    "page loaded"
                );
                self.page = Some(page);
                self.page_cursor = Some(request.cursor.clone());
                self.last_error = None;
                self.reset_search();
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(cursor = %request.cursor, error = %e, "page load failed");
                self.last_error = Some(e.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fetch and apply the page at `cursor` in one step.
    pub async fn load_page<S: CatalogSource + ?Sized>(
        &mut self,
        source: &S,
        cursor: PageCursor,
    ) -> LoadOutcome {
        let request = self.begin_load(cursor);
        let result = source.fetch_page(&request.cursor).await;
        self.complete_load(&request, result)
    }

    /// Request the next page, or `None` when there is no next cursor.
    pub fn go_to_next_page(&mut self) -> Option<PageRequest> {
        let cursor = self.page.as_ref()?.next.clone()?;
        Some(self.begin_load(cursor))
    }

    /// Request the previous page, or `None` when there is no previous cursor.
    pub fn go_to_previous_page(&mut self) -> Option<PageRequest> {
        let cursor = self.page.as_ref()?.previous.clone()?;
        Some(self.begin_load(cursor))
    }

    /// Re-fetch the held page, or the first page if nothing was loaded yet.
    pub fn reload(&mut self) -> PageRequest {
        match self.page_cursor.clone() {
            Some(cursor) => self.begin_load_as(cursor, PageDirection::Reload),
            None => self.begin_load_as(PageCursor::First, PageDirection::Initial),
        }
    }

    pub async fn next_page<S: CatalogSource + ?Sized>(&mut self, source: &S) -> Option<LoadOutcome> {
        let request = self.go_to_next_page()?;
        let result = source.fetch_page(&request.cursor).await;
        Some(self.complete_load(&request, result))
    }

    pub async fn previous_page<S: CatalogSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Option<LoadOutcome> {
        let request = self.go_to_previous_page()?;
        let result = source.fetch_page(&request.cursor).await;
        Some(self.complete_load(&request, result))
    }

    pub fn can_go_next(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.next.is_some())
    }

    pub fn can_go_previous(&self) -> bool {
        self.page.as_ref().is_some_and(|p| p.previous.is_some())
    }

    fn direction_for(&self, cursor: &PageCursor) -> PageDirection {
        if *cursor == PageCursor::First {
            return PageDirection::Initial;
        }
        match &self.page {
            Some(p) if p.next.as_ref() == Some(cursor) => PageDirection::Next,
            Some(p) if p.previous.as_ref() == Some(cursor) => PageDirection::Previous,
            _ => PageDirection::Reload,
        }
    }

    // ── Search ──────────────────────────────────────────────────

    /// Record a keystroke. The input reflects `term` immediately; the filter
    /// follows once the input has been quiet for the debounce interval.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.search.raw_term = term.clone();
        self.debouncer.schedule(term);
    }

    /// Apply a term delivered by the debouncer. Returns `false` (and changes
    /// nothing) for a term superseded by later input or by a page change.
    pub fn apply_debounced(&mut self, fired: DebouncedTerm) -> bool {
        if !self.debouncer.is_current(&fired) {
            tracing::trace!(term = %fired.term, "dropping superseded search term");
            return false;
        }
        tracing::debug!(term = %fired.term, "filter recomputed");
        self.search.debounced_term = fired.term;
        self.recomputations += 1;
        true
    }

    fn reset_search(&mut self) {
        self.debouncer.invalidate();
        self.search.clear();
    }

    /// Entries of the held page matching the debounced term, in page order.
    pub fn filtered_view(&self) -> Vec<&CatalogEntry> {
        match &self.page {
            Some(page) => filter_entries(&page.entries, &self.search.debounced_term),
            None => Vec::new(),
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn page(&self) -> Option<&CatalogPage> {
        self.page.as_ref()
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// How many times the filter term actually changed through the debouncer.
    pub fn filter_recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Overall state. A held page stays `Ready` even after a failed page
    /// change; `Failed` only occurs while no page has ever loaded.
    pub fn state(&self) -> LoadState<&CatalogPage> {
        if self.loading {
            return LoadState::Loading;
        }
        match (&self.page, &self.last_error) {
            (Some(page), _) => LoadState::Ready(page),
            (None, Some(e)) => LoadState::Failed(e.clone()),
            (None, None) => LoadState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::fixture_page;

    const PAGE2: &str = "https://pokeapi.co/api/v2/pokemon?offset=8&limit=8";

    fn controller() -> CatalogController {
        CatalogController::new(Duration::from_millis(300)).0
    }

    fn first_page() -> CatalogPage {
        fixture_page(
            &[
                "bulbasaur",
                "ivysaur",
                "venusaur",
                "charmander",
                "charmeleon",
                "charizard",
                "squirtle",
                "wartortle",
            ],
            1,
            Some(PAGE2),
            None,
        )
    }

    #[tokio::test]
    async fn begin_sets_loading_and_complete_clears_it() {
        let mut c = controller();
        assert_eq!(c.state(), LoadState::Idle);

        let req = c.begin_load(PageCursor::First);
        assert!(c.is_loading());
        assert_eq!(req.direction, PageDirection::Initial);

        assert_eq!(c.complete_load(&req, Ok(first_page())), LoadOutcome::Applied);
        assert!(!c.is_loading());
        assert_eq!(c.page_number(), 1);
        assert_eq!(c.filtered_view().len(), 8);
    }

    #[tokio::test]
    async fn failed_first_load_is_failed_state() {
        let mut c = controller();
        let req = c.begin_load(PageCursor::First);
        let outcome = c.complete_load(&req, Err(FetchError::Network("offline".into())));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(!c.is_loading());
        assert!(matches!(c.state(), LoadState::Failed(FetchError::Network(_))));
        assert!(c.filtered_view().is_empty());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let mut c = controller();
        let old = c.begin_load(PageCursor::First);
        let new = c.begin_load(PageCursor::First);

        assert_eq!(c.complete_load(&new, Ok(first_page())), LoadOutcome::Applied);
        let other = fixture_page(&["mew"], 151, None, None);
        assert_eq!(c.complete_load(&old, Ok(other)), LoadOutcome::Stale);
        assert_eq!(c.page().unwrap().entries[0].name, "bulbasaur");
    }

    #[tokio::test]
    async fn superseded_request_keeps_loading_until_latest_completes() {
        let mut c = controller();
        let old = c.begin_load(PageCursor::First);
        let _new = c.begin_load(PageCursor::First);

        assert_eq!(
            c.complete_load(&old, Ok(first_page())),
            LoadOutcome::Stale
        );
        assert!(c.is_loading());
    }

    #[tokio::test]
    async fn direction_is_inferred_from_cursors() {
        let mut c = controller();
        let req = c.begin_load(PageCursor::First);
        c.complete_load(&req, Ok(first_page()));

        let next = c.go_to_next_page().unwrap();
        assert_eq!(next.direction, PageDirection::Next);
        assert_eq!(next.cursor, PageCursor::Url(PAGE2.into()));

        let reload = c.reload();
        assert_eq!(reload.direction, PageDirection::Reload);
        assert_eq!(reload.cursor, PageCursor::First);
    }

    #[tokio::test]
    async fn previous_is_inert_on_first_page() {
        let mut c = controller();
        assert!(c.go_to_previous_page().is_none());
        assert!(c.go_to_next_page().is_none());

        let req = c.begin_load(PageCursor::First);
        c.complete_load(&req, Ok(first_page()));

        assert!(!c.can_go_previous());
        assert!(c.go_to_previous_page().is_none());
        assert!(!c.is_loading());
        assert!(c.can_go_next());
    }

    #[tokio::test]
    async fn page_number_never_drops_below_one() {
        let mut c = controller();
        let prev_url = "https://pokeapi.co/api/v2/pokemon?offset=0&limit=8";
        let req = c.begin_load(PageCursor::Url(PAGE2.into()));
        c.complete_load(&req, Ok(fixture_page(&["metapod"], 11, None, Some(prev_url))));
        assert_eq!(c.page_number(), 1);

        let req = c.go_to_previous_page().unwrap();
        c.complete_load(&req, Ok(first_page()));
        assert_eq!(c.page_number(), 1);
    }
}
