//! src/view/components/notification_overlay.rs
use crate::model::ui_state::{Notification, NotificationLevel};
use crate::view::theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::trace;

pub struct OptimizedNotificationOverlay;

impl OptimizedNotificationOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render_notification(
        &self,
        frame: &mut Frame<'_>,
        notification: &Notification,
        area: Rect,
    ) {
        trace!(level = ?notification.level, "rendering notification");
        frame.render_widget(Clear, area);

        let border_style = theme::notification_style(notification.level);
        let (title, icon) = match notification.level {
            NotificationLevel::Info => ("Info", "ℹ"),
            NotificationLevel::Warning => ("Warning", "⚠"),
            NotificationLevel::Error => ("Error", "✕"),
            NotificationLevel::Success => ("Success", "✓"),
        };
        let dismiss = if notification.auto_dismiss.is_some() {
            ""
        } else {
            " Esc to dismiss "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {icon} {title} "))
            .title_style(border_style.bold())
            .title_bottom(dismiss)
            .border_style(border_style)
            .style(Style::default().bg(theme::BACKGROUND));

        let message = Paragraph::new(notification.message.as_str())
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left)
            .block(block);
        frame.render_widget(message, area);
    }
}

impl Default for OptimizedNotificationOverlay {
    fn default() -> Self {
        Self::new()
    }
}
