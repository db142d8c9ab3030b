//! src/view/components/confirm_delete.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::model::ui_state::PendingDelete;
use crate::view::theme;

pub struct ConfirmDeleteOverlay;

impl ConfirmDeleteOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, pending: Option<&PendingDelete>, area: Rect) {
        frame.render_widget(Clear, area);

        let title = pending.map_or("this movie", |p| p.title.as_str());
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("Delete "),
                Span::styled(format!("\"{title}\""), theme::header_style()),
                Span::raw("?"),
            ]),
            Line::from(""),
            Line::from(Span::styled("y confirm · n cancel", theme::muted_style())),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Delete Movie ")
                    .title_style(theme::error_style().add_modifier(Modifier::BOLD))
                    .border_style(theme::error_style())
                    .style(theme::base_style()),
            );
        frame.render_widget(paragraph, area);
    }
}

impl Default for ConfirmDeleteOverlay {
    fn default() -> Self {
        Self::new()
    }
}
