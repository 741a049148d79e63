//! End-to-end catalog controller flows against [`MockSource`].
//!
//! Timing-sensitive tests run on a paused tokio clock so the 300 ms debounce
//! window is exercised deterministically.

use std::sync::Arc;
use std::time::Duration;

use pokedex_core::source::mock::{MockSource, fixture_page};
use pokedex_core::{
    CatalogController, CatalogPage, CatalogSource, Config, FetchError, LoadOutcome, LoadState,
    PageCursor, PageDirection,
};
use tokio::sync::mpsc;

const PAGE2: &str = "https://pokeapi.co/api/v2/pokemon?offset=8&limit=8";
const PAGE1: &str = "https://pokeapi.co/api/v2/pokemon?offset=0&limit=8";
const PAGE3: &str = "https://pokeapi.co/api/v2/pokemon?offset=16&limit=8";

fn page_one() -> CatalogPage {
    fixture_page(
        &[
            "bulbasaur",
            "ivysaur",
            "venusaur",
            "charmander",
            "squirtle",
            "wartortle",
            "blastoise",
            "caterpie",
        ],
        1,
        Some(PAGE2),
        None,
    )
}

fn page_two() -> CatalogPage {
    fixture_page(
        &[
            "metapod",
            "butterfree",
            "weedle",
            "kakuna",
            "beedrill",
            "pidgey",
            "pidgeotto",
            "pidgeot",
        ],
        11,
        Some(PAGE3),
        Some(PAGE1),
    )
}

fn source() -> MockSource {
    MockSource::new()
        .with_page(PageCursor::First, page_one())
        .with_page(PageCursor::Url(PAGE1.into()), page_one())
        .with_page(PageCursor::Url(PAGE2.into()), page_two())
}

fn names(c: &CatalogController) -> Vec<String> {
    c.filtered_view().iter().map(|e| e.name.clone()).collect()
}

/// Apply every debounced term that has fired so far.
fn drain(c: &mut CatalogController, rx: &mut mpsc::UnboundedReceiver<pokedex_core::DebouncedTerm>) {
    while let Ok(term) = rx.try_recv() {
        c.apply_debounced(term);
    }
}

#[tokio::test(start_paused = true)]
async fn initial_load_search_then_next_clears_filter() {
    let config = Config::default();
    assert!(config.first_page_url().ends_with("?limit=8&offset=0"));

    let source = source();
    let (mut c, mut rx) = CatalogController::from_config(&config);

    assert_eq!(c.load_page(&source, PageCursor::First).await, LoadOutcome::Applied);
    assert_eq!(source.page_requests(), vec![PageCursor::First]);
    assert_eq!(c.filtered_view().len(), 8);
    assert_eq!(c.page_number(), 1);

    c.set_search_term("char");
    tokio::time::sleep(Duration::from_millis(350)).await;
    drain(&mut c, &mut rx);
    assert_eq!(names(&c), vec!["charmander"]);

    let before: Vec<String> = c.page().unwrap().entries.iter().map(|e| e.name.clone()).collect();
    assert_eq!(c.next_page(&source).await, Some(LoadOutcome::Applied));

    assert_eq!(c.page_number(), 2);
    assert_eq!(c.filtered_view().len(), 8);
    assert_eq!(c.search().raw_term, "");
    assert_eq!(c.search().debounced_term, "");
    let after = names(&c);
    assert!(after.iter().all(|n| !before.contains(n)));
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_recomputes_once() {
    let source = source();
    let (mut c, mut rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    c.set_search_term("pika");
    tokio::time::sleep(Duration::from_millis(90)).await;
    c.set_search_term("pikac");
    tokio::time::sleep(Duration::from_millis(90)).await;
    c.set_search_term("pikach");

    // Input reflects keystrokes immediately; the filter has not moved yet.
    assert_eq!(c.search().raw_term, "pikach");
    assert_eq!(c.search().debounced_term, "");
    assert_eq!(c.filtered_view().len(), 8);
    assert!(c.is_search_pending());

    tokio::time::sleep(Duration::from_millis(200)).await;
    drain(&mut c, &mut rx);
    assert_eq!(c.filter_recomputations(), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    drain(&mut c, &mut rx);
    assert_eq!(c.filter_recomputations(), 1);
    assert_eq!(c.search().debounced_term, "pikach");
    // Only the current page is searched.
    assert!(c.filtered_view().is_empty());
}

#[tokio::test(start_paused = true)]
async fn separate_quiet_periods_each_recompute() {
    let source = source();
    let (mut c, mut rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    c.set_search_term("saur");
    tokio::time::sleep(Duration::from_millis(400)).await;
    drain(&mut c, &mut rx);
    assert_eq!(names(&c), vec!["bulbasaur", "ivysaur", "venusaur"]);

    c.set_search_term("SQUIRT");
    tokio::time::sleep(Duration::from_millis(400)).await;
    drain(&mut c, &mut rx);
    assert_eq!(names(&c), vec!["squirtle"]);
    assert_eq!(c.filter_recomputations(), 2);

    c.set_search_term("");
    tokio::time::sleep(Duration::from_millis(400)).await;
    drain(&mut c, &mut rx);
    assert_eq!(c.filtered_view().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn pending_search_is_dropped_by_page_change() {
    let source = source();
    let (mut c, mut rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    c.set_search_term("pidg");
    c.next_page(&source).await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    drain(&mut c, &mut rx);
    assert_eq!(c.filter_recomputations(), 0);
    assert_eq!(c.filtered_view().len(), 8);
    assert_eq!(c.search().raw_term, "");
}

#[tokio::test]
async fn previous_is_inert_on_first_page() {
    let source = source();
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    assert!(!c.can_go_previous());
    assert_eq!(c.previous_page(&source).await, None);
    assert_eq!(source.call_count(), 1);
    assert_eq!(c.page_number(), 1);
}

#[tokio::test]
async fn next_then_previous_round_trips_counter() {
    let source = source();
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    c.next_page(&source).await;
    assert_eq!(c.page_number(), 2);
    assert!(c.can_go_previous());

    assert_eq!(c.previous_page(&source).await, Some(LoadOutcome::Applied));
    assert_eq!(c.page_number(), 1);
    assert_eq!(c.page().unwrap().entries[0].name, "bulbasaur");
    assert_eq!(
        source.page_requests(),
        vec![
            PageCursor::First,
            PageCursor::Url(PAGE2.into()),
            PageCursor::Url(PAGE1.into()),
        ]
    );
}

#[tokio::test]
async fn failed_page_change_keeps_previous_page() {
    let source = source().with_page_error(
        PageCursor::Url(PAGE2.into()),
        FetchError::Response { status: 503 },
    );
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(&source, PageCursor::First).await;

    let outcome = c.next_page(&source).await;
    assert_eq!(
        outcome,
        Some(LoadOutcome::Failed(FetchError::Response { status: 503 }))
    );
    assert!(!c.is_loading());
    assert_eq!(c.page_number(), 1);
    assert_eq!(c.page().unwrap().entries[0].name, "bulbasaur");
    assert_eq!(c.last_error(), Some(&FetchError::Response { status: 503 }));
    assert!(matches!(c.state(), LoadState::Ready(_)));

    // User retries once the source recovers.
    source.set_page(PageCursor::Url(PAGE2.into()), Ok(page_two()));
    assert_eq!(c.next_page(&source).await, Some(LoadOutcome::Applied));
    assert_eq!(c.page_number(), 2);
    assert!(c.last_error().is_none());
}

#[tokio::test]
async fn failed_initial_load_surfaces_error() {
    let source = MockSource::new().with_page_error(
        PageCursor::First,
        FetchError::Network("connection refused".into()),
    );
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));

    let outcome = c.load_page(&source, PageCursor::First).await;
    assert!(matches!(outcome, LoadOutcome::Failed(FetchError::Network(_))));
    assert!(matches!(c.state(), LoadState::Failed(_)));
    assert!(c.filtered_view().is_empty());
    assert!(!c.can_go_next());
}

/// Run every request on its own task and apply completions in arrival order.
async fn run_concurrently(
    c: &mut CatalogController,
    source: Arc<MockSource>,
    requests: Vec<pokedex_core::PageRequest>,
) -> Vec<(PageDirection, LoadOutcome)> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    for request in requests {
        let source = Arc::clone(&source);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(&request.cursor).await;
            let _ = tx.send((request, result));
        });
    }
    drop(tx);

    let mut outcomes = Vec::new();
    while let Some((request, result)) = rx.recv().await {
        outcomes.push((request.direction, c.complete_load(&request, result)));
    }
    outcomes
}

#[tokio::test(start_paused = true)]
async fn slow_older_response_never_overwrites_newer_page() {
    let source = Arc::new(
        source()
            .with_page_delay(PageCursor::Url(PAGE2.into()), Duration::from_millis(500))
            .with_page_delay(PageCursor::First, Duration::from_millis(10)),
    );
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(source.as_ref(), PageCursor::First).await;

    // Next (slow) is superseded by a reload of page one (fast).
    let next = c.go_to_next_page().unwrap();
    let reload = c.reload();
    let outcomes = run_concurrently(&mut c, Arc::clone(&source), vec![next, reload]).await;

    assert_eq!(
        outcomes,
        vec![
            (PageDirection::Reload, LoadOutcome::Applied),
            (PageDirection::Next, LoadOutcome::Stale),
        ]
    );
    assert_eq!(c.page().unwrap().entries[0].name, "bulbasaur");
    assert_eq!(c.page_number(), 1);
    assert!(!c.is_loading());
}

#[tokio::test(start_paused = true)]
async fn latest_request_wins_even_when_it_finishes_last() {
    let source = Arc::new(
        source()
            .with_page_delay(PageCursor::Url(PAGE2.into()), Duration::from_millis(500))
            .with_page_delay(PageCursor::First, Duration::from_millis(10)),
    );
    let (mut c, _rx) = CatalogController::new(Duration::from_millis(300));
    c.load_page(source.as_ref(), PageCursor::First).await;

    let reload = c.reload();
    let next = c.go_to_next_page().unwrap();
    let outcomes = run_concurrently(&mut c, Arc::clone(&source), vec![reload, next]).await;

    assert_eq!(
        outcomes,
        vec![
            (PageDirection::Reload, LoadOutcome::Stale),
            (PageDirection::Next, LoadOutcome::Applied),
        ]
    );
    assert_eq!(c.page().unwrap().entries[0].name, "metapod");
    assert_eq!(c.page_number(), 2);
}
