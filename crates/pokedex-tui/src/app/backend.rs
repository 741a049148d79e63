use pokedex_core::LoadOutcome;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::PageLoaded { request, result } => {
                if self.catalog.complete_load(&request, result) == LoadOutcome::Applied {
                    // New page, unfiltered: start from the top.
                    self.cursor = 0;
                }
            }
            BackendEvent::DetailLoaded { request, result } => {
                self.detail.complete_load(&request, result);
            }
        }
    }
}
