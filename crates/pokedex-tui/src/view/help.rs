use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;

const BINDINGS: &[(&str, &str)] = &[
    ("j/k \u{2193}/\u{2191}", "Move"),
    ("Enter", "Open detail"),
    ("Esc", "Back / leave search"),
    ("/", "Search this page"),
    ("n \u{2192}", "Next page"),
    ("p \u{2190}", "Previous page"),
    ("r", "Reload"),
    ("g/G", "Top / bottom"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];

/// Render the key binding overlay centred on the screen.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = centered(f.area(), 44, BINDINGS.len() as u16 + 4);
    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<14}", key),
                    Style::default()
                        .fg(theme.active)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
