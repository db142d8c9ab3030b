//! src/view/components/error_overlay.rs
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::error::OpError;
use crate::view::theme;

/// Inline panel shown in place of the table when the first page failed.
pub struct ErrorOverlay<'a> {
    error: &'a OpError,
}

impl<'a> ErrorOverlay<'a> {
    pub const fn new(error: &'a OpError) -> Self {
        Self { error }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(" Could not load movies ")
            .borders(Borders::ALL)
            .border_style(theme::error_style())
            .style(theme::base_style());

        let hint = if self.error.is_retryable() {
            "Press r to retry"
        } else {
            "Press r to reload"
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(self.error.message.clone(), theme::error_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::muted_style())),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
