//! Help overlay listing every key binding, grouped by area
use crate::view::theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("j/k ↑↓", "Move selection"),
            ("Enter", "Show details"),
            ("n/p", "Next / previous page"),
            ("s", "Cycle sort field"),
            ("o", "Toggle sort order"),
            ("r", "Refresh"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Focus the search bar"),
            ("Ctrl+T", "Cycle search type (All, Title, Actor)"),
            ("Ctrl+F", "Cycle format filter"),
            ("x / Ctrl+U", "Clear search"),
            ("Esc", "Leave the search bar"),
        ],
    ),
    (
        "Movies",
        &[
            ("a", "Add a movie"),
            ("e", "Edit the selected movie"),
            ("d", "Delete the selected movie"),
            ("i", "Import a .txt catalog"),
        ],
    ),
    (
        "Application",
        &[
            ("?", "Toggle this help"),
            ("Esc", "Close overlay / dismiss message"),
            ("L", "Log out"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
];

pub struct OptimizedHelpOverlay;

impl OptimizedHelpOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render_fast(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let paragraph = Paragraph::new(Text::from(self.lines()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::CYAN))
                    .style(Style::default().bg(theme::BACKGROUND)),
            )
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, what) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<12}"), Style::default().fg(theme::CYAN)),
                    Span::raw(*what),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }
}

impl Default for OptimizedHelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
