//! src/view/components/status_bar.rs
//!
//! Header line (session, totals, paging, sort) and footer key hints.

use crate::{
    model::{auth_state::AuthState, ui_state::UIMode},
    view::{
        snapshots::{MovieSnapshot, UiSnapshot},
        theme,
    },
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

pub struct OptimizedStatusBar;

impl OptimizedStatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render_header(
        &self,
        frame: &mut Frame<'_>,
        movies: &MovieSnapshot,
        auth: &AuthState,
        area: Rect,
    ) {
        let session = if auth.is_authenticated {
            "● Signed in"
        } else {
            "○ Signed out"
        };

        let mut left = vec![
            Span::styled(" Movie Shelf ", theme::title_style()),
            Span::styled(session, Style::default().fg(theme::GREEN)),
        ];
        if movies.loading || movies.busy {
            left.push(Span::styled("  ⟳ working…", theme::muted_style()));
        }

        let right_text = format!(
            "{} total | {} | Sort: {} ",
            movies.total,
            movies.page_label(),
            movies.sort_label()
        );

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        Paragraph::new(Line::from(left))
            .style(theme::base_style())
            .alignment(Alignment::Left)
            .render(layout[0], frame.buffer_mut());

        Paragraph::new(right_text)
            .style(theme::base_style())
            .alignment(Alignment::Right)
            .render(layout[1], frame.buffer_mut());
    }

    pub fn render_hints(&self, frame: &mut Frame<'_>, ui: &UiSnapshot, area: Rect) {
        let hints = match ui.mode {
            UIMode::Search => "type to search · Ctrl+T type · Ctrl+F format · Ctrl+U clear · Esc done",
            UIMode::Browse => {
                "j/k move · Enter details · n/p page · s sort · o order · / search · a add · d delete · i import · r refresh · ? help · L logout · q quit"
            }
        };

        Paragraph::new(hints)
            .style(theme::muted_style().bg(theme::BACKGROUND))
            .alignment(Alignment::Left)
            .render(area, frame.buffer_mut());
    }
}

impl Default for OptimizedStatusBar {
    fn default() -> Self {
        Self::new()
    }
}
