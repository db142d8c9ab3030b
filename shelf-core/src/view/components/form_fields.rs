//! src/view/components/form_fields.rs
//! Shared rendering for labelled single-line inputs.

use ratatui::text::{Line, Span};

use crate::model::form::TextField;
use crate::view::theme;

/// Two lines per field (label, value) plus a spacer. The focused field gets
/// a cursor block.
pub fn field_lines(fields: &[&TextField], focus: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(fields.len() * 3);
    for (idx, field) in fields.iter().enumerate() {
        let focused = idx == focus;
        let label_style = if focused {
            theme::focused_field_style()
        } else {
            theme::muted_style()
        };
        lines.push(Line::from(Span::styled(field.label, label_style)));

        let mut value = field.display();
        if focused {
            value.push('▏');
        }
        lines.push(Line::from(vec![Span::raw("  "), Span::raw(value)]));
        lines.push(Line::from(""));
    }
    lines
}
