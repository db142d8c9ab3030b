//! src/view/components/movie_form.rs
//! Add / edit overlay.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::model::form::MovieForm;
use crate::view::components::form_fields::field_lines;
use crate::view::snapshots::MovieSnapshot;
use crate::view::theme;

pub struct MovieFormOverlay;

impl MovieFormOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        form: &MovieForm,
        movies: &MovieSnapshot,
        title: &str,
        area: Rect,
    ) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [fields_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(2)]).areas(inner);

        frame.render_widget(
            Paragraph::new(field_lines(&form.fields(), form.focus)),
            fields_area,
        );

        let status = if movies.busy {
            Line::from(Span::styled("Saving…", theme::muted_style()))
        } else {
            Line::from(Span::styled(
                "Tab next · Shift+Tab prev · Enter save · Esc cancel",
                theme::muted_style(),
            ))
        };
        frame.render_widget(Paragraph::new(status), status_area);
    }
}

impl Default for MovieFormOverlay {
    fn default() -> Self {
        Self::new()
    }
}
