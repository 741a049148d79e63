use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use pokedex_core::{LoadState, entry_id};

use crate::app::{App, InputMode};
use crate::theme::Theme;
use crate::view::{display_name, spinner_char, truncate};

/// Render the catalog list into `area`, with the pager/status line in `footer_area`.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let has_search = app.input_mode == InputMode::Search || !app.catalog.search().raw_term.is_empty();

    let mut constraints = vec![Constraint::Length(1)]; // header
    if has_search {
        constraints.push(Constraint::Length(1)); // search bar
    }
    constraints.push(Constraint::Min(3)); // table

    let chunks = Layout::vertical(constraints).split(area);
    let mut chunk_idx = 0;

    render_header(f, chunks[chunk_idx], app, theme);
    chunk_idx += 1;

    if has_search {
        render_search_bar(f, chunks[chunk_idx], app, theme);
        chunk_idx += 1;
    }

    render_body(f, chunks[chunk_idx], app, theme);
    render_footer(f, footer_area, app, theme);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![
        Span::styled(" Pokedex ", theme.header_style()),
        Span::styled(
            format!(" Page {}", app.catalog.page_number()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(page) = app.catalog.page() {
        spans.push(Span::styled(
            format!("  ({} known)", page.total_count),
            Style::default().fg(theme.dim),
        ));
    }

    if app.catalog.is_loading() {
        spans.push(Span::styled(
            format!("  {} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let search = app.catalog.search();
    let mut spans = vec![
        Span::styled(" / ", Style::default().fg(theme.active)),
        Span::styled(search.raw_term.clone(), Style::default().fg(theme.text)),
    ];
    if app.input_mode == InputMode::Search {
        spans.push(Span::styled("\u{2588}", Style::default().fg(theme.active)));
    }
    if search.is_settling() {
        spans.push(Span::styled(
            format!(" {}", spinner_char(app.tick)),
            Style::default().fg(theme.dim),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let message = match app.catalog.state() {
        LoadState::Idle => Some(("Waiting to load\u{2026}".to_string(), theme.dim)),
        LoadState::Loading if app.catalog.page().is_none() => Some((
            format!("{} Loading Pokemon\u{2026}", spinner_char(app.tick)),
            theme.spinner,
        )),
        LoadState::Failed(e) => Some((format!("Could not load Pokemon: {}", e), theme.error)),
        _ if app.catalog.filtered_view().is_empty() => {
            Some(("No Pokemon found".to_string(), theme.dim))
        }
        _ => None,
    };

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));

    if let Some((text, color)) = message {
        let para = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
            .centered()
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(12).min(32);
    let rows: Vec<Row> = app
        .catalog
        .filtered_view()
        .into_iter()
        .map(|entry| {
            let id = entry_id(&entry.source_url)
                .map(|id| format!("#{:04}", id))
                .unwrap_or_else(|| "#????".to_string());
            let artwork = entry.image_url.as_deref().unwrap_or("-");
            Row::new(vec![
                Cell::from(Span::styled(id, Style::default().fg(theme.dim))),
                Cell::from(Span::styled(
                    truncate(&display_name(&entry.name), name_width),
                    Style::default().fg(theme.text),
                )),
                Cell::from(Span::styled(artwork.to_string(), Style::default().fg(theme.dim))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(name_width as u16),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Id", "Name", "Artwork"])
                .style(Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(theme.highlight_style())
        .block(block);

    let mut state = TableState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut spans = vec![
        Span::styled(" [p] prev", theme.control_style(app.catalog.can_go_previous())),
        Span::styled("  ", theme.footer_style()),
        Span::styled("[n] next", theme.control_style(app.catalog.can_go_next())),
        Span::styled(
            "  [/] search  [Enter] open  [r] reload  [?] help  [q] quit",
            theme.footer_style(),
        ),
    ];

    // A failed page change leaves the old page visible; say why nothing moved.
    if app.catalog.page().is_some()
        && let Some(err) = app.catalog.last_error()
    {
        spans.push(Span::styled(
            format!("  {}", err),
            Style::default().fg(theme.error),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.footer_style()), area);
}
