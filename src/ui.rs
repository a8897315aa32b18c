//! The UI renders the hierarchy screen into something visible.
//!
//! [`Screen`] is the terminal's [`HierarchyHost`]: it keeps a copy of whatever the session last
//! rendered, the last error and the final outcome. The draw function lays that out as a
//! breadcrumb, the list of rows and a help line.

use crate::element::{ElementKind, HierarchyElement};
use crate::session::{HierarchyHost, Outcome};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Name shown before the form title in the breadcrumb.
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Default)]
/// Everything the session has asked the terminal to show.
pub struct Screen {
    /// Title of the form being browsed.
    pub title: String,
    /// Breadcrumb of the level shown.
    pub path_text: String,
    /// Whether the level has a parent to ascend to.
    pub ascend_enabled: bool,
    /// Rows of the level shown.
    pub rows: Vec<HierarchyElement>,
    /// Error waiting to be acknowledged.
    pub message: Option<String>,
    /// How the session ended, once it has.
    pub outcome: Option<Outcome>,
}

impl Screen {
    #[must_use]
    /// Empty screen for the form titled `title`.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

impl HierarchyHost for Screen {
    fn render(&mut self, path_text: &str, ascend_enabled: bool, elements: &[HierarchyElement]) {
        self.path_text = path_text.to_string();
        self.ascend_enabled = ascend_enabled;
        self.rows = elements.to_vec();
    }

    fn show_error(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    fn finish_with(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

/// Renders the screen with the row at `focus` highlighted.
pub fn draw(f: &mut Frame, screen: &Screen, focus: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Rows
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let breadcrumb = if screen.ascend_enabled {
        screen.path_text.as_str()
    } else {
        ""
    };
    let breadcrumb_widget = Paragraph::new(breadcrumb).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{APP_NAME} > {}", screen.title)),
    );
    f.render_widget(breadcrumb_widget, chunks[0]);

    let items: Vec<ListItem> = screen.rows.iter().map(row_line).map(ListItem::new).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Hierarchy"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(focus));
    f.render_stateful_widget(list, chunks[1], &mut state);

    let help = if let Some(ref msg) = screen.message {
        Paragraph::new(msg.as_str()).style(Style::default().fg(Color::Red))
    } else if screen.ascend_enabled {
        Paragraph::new(
            "↑/↓: Navigate | Enter: Open | u: Up a level | g/G: Start/End | Esc: Back | q: Quit",
        )
    } else {
        Paragraph::new("↑/↓: Navigate | Enter: Open | g/G: Start/End | Esc: Back | q: Quit")
    };
    f.render_widget(help.block(Block::default().borders(Borders::ALL)), chunks[2]);
}

fn row_line(row: &HierarchyElement) -> Line<'_> {
    match row.kind {
        ElementKind::Question => {
            let mut spans = vec![Span::raw(row.label.as_str())];
            if let Some(answer) = row.secondary.as_deref().filter(|a| !a.is_empty()) {
                spans.push(Span::styled(
                    format!("  {answer}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        ElementKind::Collapsed => Line::from(vec![
            Span::styled("▸ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                row.label.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        ElementKind::Expanded => Line::from(vec![
            Span::styled("▾ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                row.label.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        ElementKind::Up => Line::from(vec![
            Span::styled("↰ ", Style::default().fg(Color::Cyan)),
            Span::styled(row.label.as_str(), Style::default().fg(Color::DarkGray)),
        ]),
        ElementKind::Child => Line::from(Span::styled(
            row.label.as_str(),
            Style::default().fg(Color::Blue),
        )),
    }
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
