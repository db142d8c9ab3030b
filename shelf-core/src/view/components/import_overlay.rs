//! src/view/components/import_overlay.rs
//! Catalog import: path entry, local preview, then upload.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::model::form::ImportForm;
use crate::util::humanize::human_readable_size;
use crate::view::components::form_fields::field_lines;
use crate::view::theme;

/// Parse errors listed under the preview.
const ERROR_LINES: usize = 3;

pub struct ImportOverlay;

impl ImportOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, form: &ImportForm, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Import Movies ")
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        let mut lines = field_lines(&[&form.path], 0);
        lines.extend(self.preview_lines(form));

        if let Some(err) = &form.error {
            lines.push(Line::from(Span::styled(err.clone(), theme::error_style())));
            lines.push(Line::from(""));
        }

        let hint = if form.uploading {
            "Uploading…"
        } else if form.can_upload() {
            "Enter upload · Esc cancel"
        } else {
            "Enter preview · Esc cancel"
        };
        lines.push(Line::from(Span::styled(hint, theme::muted_style())));

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn preview_lines(&self, form: &ImportForm) -> Vec<Line<'static>> {
        let (Some(file), Some(summary)) = (&form.preview, form.summary()) else {
            return Vec::new();
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(summary, theme::header_style()),
            Span::styled(
                format!("  ({}, {})", file.file_name, human_readable_size(file.bytes.len() as u64)),
                theme::muted_style(),
            ),
        ])];

        for draft in form.sample() {
            lines.push(Line::from(vec![
                Span::raw("  • "),
                Span::raw(draft.title.clone()),
                Span::styled(
                    format!(" ({}, {})", draft.year, draft.format),
                    theme::muted_style(),
                ),
            ]));
        }
        let more = file.outcome.movies.len().saturating_sub(form.sample().len());
        if more > 0 {
            lines.push(Line::from(Span::styled(
                format!("  … and {more} more"),
                theme::muted_style(),
            )));
        }

        for err in file.outcome.errors.iter().take(ERROR_LINES) {
            lines.push(Line::from(Span::styled(
                format!("  {err}"),
                Style::default().fg(theme::YELLOW),
            )));
        }
        lines.push(Line::from(""));
        lines
    }
}

impl Default for ImportOverlay {
    fn default() -> Self {
        Self::new()
    }
}
