//! Remote catalog source trait and implementations.

pub mod mock;
pub mod pokeapi;

use std::future::Future;
use std::pin::Pin;

use crate::FetchError;
use crate::model::{CatalogPage, EntryDetail, PageCursor};

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// A paginated catalog that can be listed page by page and queried per entry.
pub trait CatalogSource: Send + Sync {
    /// Human-readable name used in logs (e.g. "PokeAPI").
    fn name(&self) -> &str;

    /// Fetch the page addressed by `cursor`.
    fn fetch_page<'a>(&'a self, cursor: &'a PageCursor) -> FetchFuture<'a, CatalogPage>;

    /// Fetch the full record for the entry called `name`.
    fn fetch_detail<'a>(&'a self, name: &'a str) -> FetchFuture<'a, EntryDetail>;
}
