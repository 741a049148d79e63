use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use pokedex_core::{EntryDetail, LoadState};

use crate::app::{App, Screen};
use crate::theme::Theme;
use crate::view::{display_name, spinner_char};

/// Render the detail screen for the selected entry.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let name = match &app.screen {
        Screen::Detail(name) => name.as_str(),
        Screen::List => "",
    };

    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

    let header = Line::from(vec![
        Span::styled(" Pokedex ", theme.header_style()),
        Span::styled(
            format!(" {}", display_name(name)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), header_area);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));

    let body = match app.detail.state() {
        LoadState::Idle => Paragraph::new(Span::styled(
            "No Pokemon selected",
            Style::default().fg(theme.dim),
        ))
        .centered(),
        LoadState::Loading => Paragraph::new(Span::styled(
            format!("{} Loading {}\u{2026}", spinner_char(app.tick), display_name(name)),
            Style::default().fg(theme.spinner),
        ))
        .centered(),
        LoadState::Failed(e) => Paragraph::new(vec![
            Line::from(Span::styled(
                "Pokemon not found!",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(e.to_string(), Style::default().fg(theme.dim))),
        ])
        .centered(),
        LoadState::Ready(detail) => Paragraph::new(detail_lines(detail, theme))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0)),
    };
    f.render_widget(body.block(block), body_area);

    let footer = Paragraph::new(Span::styled(
        " [Esc] back  [j/k] scroll  [r] reload  [q] quit",
        theme.footer_style(),
    ))
    .style(theme.footer_style());
    f.render_widget(footer, footer_area);
}

fn section<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn bullet(text: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  \u{2022} ", Style::default().fg(theme.dim)),
        Span::styled(text, Style::default().fg(theme.text)),
    ])
}

fn detail_lines<'a>(detail: &'a EntryDetail, theme: &Theme) -> Vec<Line<'a>> {
    let label = Style::default().fg(theme.dim);
    let value = Style::default().fg(theme.text);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Id      ", label),
            Span::styled(format!("#{:04}", detail.id), value),
        ]),
        Line::from(vec![
            Span::styled("Height  ", label),
            Span::styled(detail.height.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Weight  ", label),
            Span::styled(detail.weight.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Sprite  ", label),
            Span::styled(detail.sprite_url.as_deref().unwrap_or("-"), value),
        ]),
        Line::default(),
        section("Abilities", theme),
    ];
    lines.extend(
        detail
            .abilities()
            .iter()
            .map(|a| bullet(display_name(&a.name), theme)),
    );

    lines.push(Line::default());
    lines.push(section("Types", theme));
    lines.extend(detail.types().iter().map(|t| bullet(display_name(t), theme)));

    lines.push(Line::default());
    lines.push(section("Stats", theme));
    lines.extend(
        detail
            .stats()
            .iter()
            .map(|s| bullet(format!("{}: {}", s.name, s.base_stat), theme)),
    );

    lines.push(Line::default());
    lines.push(section("Moves", theme));
    lines.extend(
        detail
            .display_moves()
            .iter()
            .map(|m| bullet(display_name(m), theme)),
    );
    if detail.moves.len() > detail.display_moves().len() {
        lines.push(Line::from(Span::styled(
            format!("  \u{2026} and {} more", detail.moves.len() - detail.display_moves().len()),
            label,
        )));
    }

    lines
}
