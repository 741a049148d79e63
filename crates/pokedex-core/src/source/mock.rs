//! In-memory catalog source for testing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CatalogSource, FetchFuture};
use crate::FetchError;
use crate::model::{Ability, CatalogEntry, CatalogPage, EntryDetail, PageCursor, Stat};

/// A hand-rolled [`CatalogSource`] serving canned pages and details.
///
/// Supports:
/// - A response per cursor / per name (unknown keys answer `NotFound`).
/// - Optional per-cursor latency, to provoke out-of-order completions.
/// - Call counting and a log of requested cursors and names.
#[derive(Default)]
pub struct MockSource {
    pages: Mutex<HashMap<PageCursor, Result<CatalogPage, FetchError>>>,
    details: Mutex<HashMap<String, Result<EntryDetail, FetchError>>>,
    page_delays: HashMap<PageCursor, Duration>,
    detail_delay: Option<Duration>,
    page_log: Mutex<Vec<PageCursor>>,
    detail_log: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, cursor: PageCursor, page: CatalogPage) -> Self {
        self.set_page(cursor, Ok(page));
        self
    }

    pub fn with_page_error(self, cursor: PageCursor, err: FetchError) -> Self {
        self.set_page(cursor, Err(err));
        self
    }

    pub fn with_page_delay(mut self, cursor: PageCursor, delay: Duration) -> Self {
        self.page_delays.insert(cursor, delay);
        self
    }

    pub fn with_detail(self, detail: EntryDetail) -> Self {
        let name = detail.name.clone();
        self.set_detail(&name, Ok(detail));
        self
    }

    pub fn with_detail_error(self, name: &str, err: FetchError) -> Self {
        self.set_detail(name, Err(err));
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    /// Replace the response for `cursor` (e.g. make a failing page recover).
    pub fn set_page(&self, cursor: PageCursor, response: Result<CatalogPage, FetchError>) {
        self.pages.lock().unwrap().insert(cursor, response);
    }

    pub fn set_detail(&self, name: &str, response: Result<EntryDetail, FetchError>) {
        self.details
            .lock()
            .unwrap()
            .insert(name.to_string(), response);
    }

    /// How many fetches (pages and details) have been issued.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn page_requests(&self) -> Vec<PageCursor> {
        self.page_log.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> Vec<String> {
        self.detail_log.lock().unwrap().clone()
    }
}

impl CatalogSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_page<'a>(&'a self, cursor: &'a PageCursor) -> FetchFuture<'a, CatalogPage> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.page_log.lock().unwrap().push(cursor.clone());
        let response = self
            .pages
            .lock()
            .unwrap()
            .get(cursor)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(cursor.to_string())));
        let delay = self.page_delays.get(cursor).copied();

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            response
        })
    }

    fn fetch_detail<'a>(&'a self, name: &'a str) -> FetchFuture<'a, EntryDetail> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.detail_log.lock().unwrap().push(name.to_string());
        let response = self
            .details
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(name.to_string())));
        let delay = self.detail_delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            response
        })
    }
}

/// Build a page whose entries get consecutive ids starting at `first_id`.
pub fn fixture_page(
    names: &[&str],
    first_id: u32,
    next: Option<&str>,
    previous: Option<&str>,
) -> CatalogPage {
    CatalogPage {
        entries: names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                CatalogEntry::new(
                    *name,
                    format!(
                        "https://pokeapi.co/api/v2/pokemon/{}/",
                        first_id + i as u32
                    ),
                    crate::DEFAULT_ARTWORK_TEMPLATE,
                )
            })
            .collect(),
        next: next.map(|u| PageCursor::Url(u.to_string())),
        previous: previous.map(|u| PageCursor::Url(u.to_string())),
        total_count: 1302,
    }
}

/// Build a detail record with `move_count` generated moves.
pub fn fixture_detail(name: &str, id: u32, move_count: usize) -> EntryDetail {
    EntryDetail {
        id,
        name: name.to_string(),
        height: 7,
        weight: 69,
        abilities: vec![Ability {
            name: "overgrow".to_string(),
            url: "https://pokeapi.co/api/v2/ability/65/".to_string(),
        }],
        types: vec!["grass".to_string(), "poison".to_string()],
        stats: vec![
            Stat {
                name: "hp".to_string(),
                base_stat: 45,
            },
            Stat {
                name: "speed".to_string(),
                base_stat: 45,
            },
        ],
        moves: (0..move_count).map(|i| format!("move-{}", i + 1)).collect(),
        sprite_url: Some(format!(
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{}.png",
            id
        )),
    }
}
