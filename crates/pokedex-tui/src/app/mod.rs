mod backend;
mod update;


use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use pokedex_core::{CatalogController, CatalogEntry, Config, DebouncedTerm, DetailController};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    /// Detail view for the named entry.
    Detail(String),
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub catalog: CatalogController,
    pub detail: DetailController,
    /// Row under the cursor, an index into the filtered view.
    pub cursor: usize,
    pub detail_scroll: u16,
    pub tick: usize,
    pub theme: Theme,
    pub show_help: bool,
    pub should_quit: bool,
    /// Height of the visible table area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    /// Build the app and the receiver on which debounced search terms arrive.
    pub fn new(config: &Config, theme: Theme) -> (Self, mpsc::UnboundedReceiver<DebouncedTerm>) {
        let (catalog, debounce_rx) = CatalogController::from_config(config);
        let app = Self {
            screen: Screen::List,
            input_mode: InputMode::Normal,
            catalog,
            detail: DetailController::new(),
            cursor: 0,
            detail_scroll: 0,
            tick: 0,
            theme,
            show_help: false,
            should_quit: false,
            visible_rows: 20,
            backend_cmd_tx: None,
        };
        (app, debounce_rx)
    }

    /// Kick off the initial page load.
    pub fn start(&mut self) {
        let request = self.catalog.reload();
        self.send(BackendCommand::LoadPage(request));
    }

    pub(crate) fn send(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!("backend channel closed, dropping command");
                }
            }
            None => tracing::debug!(?cmd, "no backend attached"),
        }
    }

    /// Apply a search term delivered by the debouncer.
    pub fn apply_debounced(&mut self, term: DebouncedTerm) {
        if self.catalog.apply_debounced(term) {
            self.clamp_cursor();
        }
    }

    /// Entry under the cursor in the filtered view.
    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.catalog.filtered_view().get(self.cursor).copied()
    }

    pub(crate) fn clamp_cursor(&mut self) {
        let len = self.catalog.filtered_view().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn view(&mut self, f: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(f.area());

        match self.screen.clone() {
            Screen::List => crate::view::list::render_in(f, self, main, footer),
            Screen::Detail(_) => crate::view::detail::render_in(f, self, main, footer),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
