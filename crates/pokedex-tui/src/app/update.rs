use super::{App, InputMode, Screen};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Help overlay swallows everything but quit/close
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::ToggleHelp | Action::NavigateBack | Action::SearchCancel => {
                    self.show_help = false;
                }
                Action::Tick => self.tick = self.tick.wrapping_add(1),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(6);
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::PageDown => self.move_cursor(self.visible_rows.max(1) as isize),
            Action::PageUp => self.move_cursor(-(self.visible_rows.max(1) as isize)),
            Action::GoTop => match self.screen {
                Screen::List => self.cursor = 0,
                Screen::Detail(_) => self.detail_scroll = 0,
            },
            Action::GoBottom => {
                if self.screen == Screen::List {
                    self.cursor = self.catalog.filtered_view().len().saturating_sub(1);
                }
            }
            Action::DrillIn => self.open_selected(),
            Action::NavigateBack => {
                if let Screen::Detail(_) = self.screen {
                    self.close_detail();
                }
            }
            Action::NextPage => {
                if self.screen == Screen::List
                    && let Some(request) = self.catalog.go_to_next_page()
                {
                    self.send(BackendCommand::LoadPage(request));
                }
            }
            Action::PrevPage => {
                if self.screen == Screen::List
                    && let Some(request) = self.catalog.go_to_previous_page()
                {
                    self.send(BackendCommand::LoadPage(request));
                }
            }
            Action::Reload => match self.screen {
                Screen::List => {
                    let request = self.catalog.reload();
                    self.send(BackendCommand::LoadPage(request));
                }
                Screen::Detail(_) => {
                    if let Some(request) = self.detail.reload() {
                        self.send(BackendCommand::LoadDetail(request));
                    }
                }
            },
            Action::StartSearch => {
                if self.screen == Screen::List {
                    self.input_mode = InputMode::Search;
                }
            }
            Action::SearchInput(ch) => {
                if self.input_mode == InputMode::Search {
                    let mut term = self.catalog.search().raw_term.clone();
                    if ch == '\x08' {
                        term.pop();
                    } else {
                        term.push(ch);
                    }
                    self.catalog.set_search_term(term);
                }
            }
            Action::SearchConfirm | Action::SearchCancel => {
                // Leaving the input keeps the term; it still settles through the debouncer.
                self.input_mode = InputMode::Normal;
            }
            Action::None => {}
        }
        false
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.screen {
            Screen::List => {
                let len = self.catalog.filtered_view().len();
                if len == 0 {
                    self.cursor = 0;
                    return;
                }
                let next = self.cursor as isize + delta;
                self.cursor = next.clamp(0, len as isize - 1) as usize;
            }
            Screen::Detail(_) => {
                let next = self.detail_scroll as isize + delta;
                self.detail_scroll = next.clamp(0, u16::MAX as isize) as u16;
            }
        }
    }

    fn open_selected(&mut self) {
        if self.screen != Screen::List {
            return;
        }
        let Some(name) = self.selected_entry().map(|e| e.name.clone()) else {
            return;
        };
        self.input_mode = InputMode::Normal;
        self.detail_scroll = 0;
        self.screen = Screen::Detail(name.clone());
        if let Some(request) = self.detail.set_identifier(Some(&name)) {
            self.send(BackendCommand::LoadDetail(request));
        }
    }

    /// Leave the detail view. The identifier is released so the next visit
    /// fetches afresh.
    fn close_detail(&mut self) {
        self.detail.set_identifier(None);
        self.detail_scroll = 0;
        self.screen = Screen::List;
    }
}
