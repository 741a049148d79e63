use pokedex_core::{CatalogPage, DetailRequest, EntryDetail, FetchError, PageRequest};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    LoadPage(PageRequest),
    LoadDetail(DetailRequest),
}

/// Events flowing from the backend fetch tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    PageLoaded {
        request: PageRequest,
        result: Result<CatalogPage, FetchError>,
    },
    DetailLoaded {
        request: DetailRequest,
        result: Result<EntryDetail, FetchError>,
    },
}
