use std::time::Duration;
use thiserror::Error;

pub mod artwork;
pub mod catalog;
pub mod config_file;
pub mod detail;
pub mod load_state;
pub mod model;
pub mod search;
pub mod source;

// Re-export for convenience
pub use artwork::{artwork_url, entry_id};
pub use catalog::{CatalogController, LoadOutcome, PageDirection, PageRequest};
pub use detail::{DetailController, DetailRequest, MAX_DISPLAY_MOVES};
pub use load_state::LoadState;
pub use model::{Ability, CatalogEntry, CatalogPage, EntryDetail, PageCursor, Stat};
pub use search::{DebouncedTerm, Debouncer, SearchState};
pub use source::CatalogSource;
pub use source::pokeapi::PokeApi;

/// Default list endpoint.
pub const DEFAULT_LIST_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Default base for detail lookups; the entry name is appended as a path segment.
pub const DEFAULT_DETAIL_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Official artwork location, `{id}` is replaced by the numeric entry id.
pub const DEFAULT_ARTWORK_TEMPLATE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{id}.png";

pub const DEFAULT_PAGE_SIZE: u32 = 8;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Why a fetch against the remote catalog failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connect failure, timeout, truncated body).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status other than 404.
    #[error("HTTP {status}")]
    Response { status: u16 },
    /// 404 from the server, or an identifier that was never resolved.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Runtime configuration for the catalog client and controllers.
#[derive(Debug, Clone)]
pub struct Config {
    pub list_url: String,
    pub detail_url: String,
    pub artwork_template: String,
    pub page_size: u32,
    /// Quiet interval before a typed search term takes effect.
    pub debounce: Duration,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            detail_url: DEFAULT_DETAIL_URL.to_string(),
            artwork_template: DEFAULT_ARTWORK_TEMPLATE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// URL of the first page, `list_url?limit=<page_size>&offset=0`.
    pub fn first_page_url(&self) -> String {
        let sep = if self.list_url.contains('?') { '&' } else { '?' };
        format!("{}{}limit={}&offset=0", self.list_url, sep, self.page_size)
    }

    /// URL of the detail record for `name`.
    pub fn detail_url_for(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.detail_url.trim_end_matches('/'),
            urlencoding::encode(&name.to_lowercase())
        )
    }
}
