//! src/view/components/auth_form.rs
//! Full-screen login / register view shown while signed out.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::model::auth_state::AuthState;
use crate::model::form::{AuthForm, AuthMode};
use crate::view::components::form_fields::field_lines;
use crate::view::theme;
use crate::view::ui::centered_rect;

pub struct AuthView;

impl AuthView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, form: &AuthForm, auth: &AuthState, area: Rect) {
        frame.render_widget(Block::default().style(theme::base_style()), area);

        let height = match form.mode {
            AuthMode::Login => 16,
            AuthMode::Register => 22,
        };
        let panel = centered_rect(60, 100, area);
        let panel = Rect {
            height: height.min(panel.height),
            y: panel.y + panel.height.saturating_sub(height) / 2,
            ..panel
        };
        frame.render_widget(Clear, panel);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Movie Shelf ")
            .title_alignment(Alignment::Center)
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [tabs_area, fields_area, status_area, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);

        let selected = match form.mode {
            AuthMode::Login => 0,
            AuthMode::Register => 1,
        };
        let tabs = Tabs::new(["Login", "Register"])
            .style(theme::muted_style())
            .highlight_style(theme::header_style())
            .select(selected);
        frame.render_widget(tabs, tabs_area);

        let fields = form.fields();
        frame.render_widget(
            Paragraph::new(field_lines(&fields, form.focus)),
            fields_area,
        );

        let status = if auth.loading {
            Line::from(Span::styled("Signing in…", theme::muted_style()))
        } else if let Some(err) = &auth.error {
            Line::from(Span::styled(err.message.clone(), theme::error_style()))
        } else if auth.expired {
            Line::from(Span::styled(
                "Your session expired. Please log in again.",
                Style::default().fg(theme::YELLOW),
            ))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), status_area);

        let hint = Line::from(Span::styled(
            "Tab switch mode · ↑↓ move · Enter submit · Ctrl+C quit",
            theme::muted_style(),
        ));
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), hint_area);
    }
}

impl Default for AuthView {
    fn default() -> Self {
        Self::new()
    }
}
