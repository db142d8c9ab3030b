//! src/view/components/search_bar.rs
//! One-line search input with its type selector and format filter.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::model::ui_state::UIMode;
use crate::view::snapshots::UiSnapshot;
use crate::view::theme;

pub struct SearchBar;

impl SearchBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, ui: &UiSnapshot, area: Rect) {
        let focused = ui.mode == UIMode::Search;
        let input = &ui.search;

        let format = input.format.map_or("Any", |f| f.as_str());
        let mut text = input.text.clone();
        if focused {
            text.push('▏');
        } else if text.is_empty() {
            text.push_str("Press / to search");
        }

        let text_style = if focused || !input.text.is_empty() {
            Style::default().fg(theme::FOREGROUND)
        } else {
            theme::muted_style()
        };

        let mut spans = vec![
            Span::styled(format!("[{}] ", input.search_type.label()), theme::header_style()),
            Span::styled(text, text_style),
            Span::raw("  "),
            Span::styled(format!("Format: {format}"), theme::muted_style()),
        ];
        if ui.search_pending {
            spans.push(Span::styled("  …", theme::muted_style()));
        }

        let border = if focused {
            theme::focused_field_style()
        } else {
            theme::muted_style()
        };
        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search (Ctrl+T type · Ctrl+F format) ")
                .border_style(border)
                .style(theme::base_style()),
        );
        frame.render_widget(paragraph, area);
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}
