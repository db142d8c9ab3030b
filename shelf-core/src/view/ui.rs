//! src/view/ui.rs
//! ============================================================
//! Frame renderer. State is copied into a `FrameSnapshot` first;
//! no lock is held while painting.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, trace};

use crate::{
    controller::state_coordinator::StateCoordinator,
    model::ui_state::{NotificationLevel, UIOverlay},
    view::{
        components::{
            auth_form::AuthView, confirm_delete::ConfirmDeleteOverlay,
            help_overlay::OptimizedHelpOverlay, import_overlay::ImportOverlay,
            movie_details::MovieDetailsOverlay, movie_form::MovieFormOverlay,
            movie_table::MovieTable, notification_overlay::OptimizedNotificationOverlay,
            search_bar::SearchBar, status_bar::OptimizedStatusBar,
        },
        snapshots::FrameSnapshot,
    },
};

#[derive(Debug, Default)]
pub struct UIRenderer {
    stats: RenderStats,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 && !self.total.is_zero() {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl UIRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn get_stats(&self) -> RenderStats {
        self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, coord: &StateCoordinator) {
        let start = Instant::now();
        let snap = FrameSnapshot::capture(coord);
        coord.ui_state().increment_frame();

        self.draw(f, &snap);

        let dur = start.elapsed();
        self.stats.total += dur;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
        }
        self.stats.frames += 1;
        trace!(frame = self.stats.frames, "frame drawn");
    }

    /// Paint one frame from a snapshot.
    pub fn draw(&self, f: &mut Frame<'_>, snap: &FrameSnapshot) {
        let screen = f.area();

        if snap.auth.is_authenticated {
            self.draw_main(f, snap, screen);
            self.draw_overlay(f, snap, screen);
        } else {
            AuthView::new().render(f, &snap.ui.auth_form, &snap.auth, screen);
        }

        if let Some(n) = &snap.ui.notification {
            let r = notification_rect(screen, n.level);
            OptimizedNotificationOverlay::new().render_notification(f, n, r);
        }
    }

    fn draw_main(&self, f: &mut Frame<'_>, snap: &FrameSnapshot, area: Rect) {
        let [header, search, table, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let status = OptimizedStatusBar::new();
        status.render_header(f, &snap.movies, &snap.auth, header);
        SearchBar::new().render(f, &snap.ui, search);
        MovieTable::new().render(f, &snap.movies, snap.ui.selected, table);
        status.render_hints(f, &snap.ui, hints);
    }

    fn draw_overlay(&self, f: &mut Frame<'_>, snap: &FrameSnapshot, screen: Rect) {
        let ui = &snap.ui;
        match ui.overlay {
            UIOverlay::None => {}
            UIOverlay::Help => {
                OptimizedHelpOverlay::new().render_fast(f, centered_rect(70, 80, screen));
            }
            UIOverlay::Details => MovieDetailsOverlay::new().render(
                f,
                &snap.movies,
                ui.overlay_title,
                centered_rect(60, 60, screen),
            ),
            UIOverlay::MovieForm => MovieFormOverlay::new().render(
                f,
                &ui.movie_form,
                &snap.movies,
                ui.overlay_title,
                centered_rect(60, 70, screen),
            ),
            UIOverlay::Import => {
                ImportOverlay::new().render(f, &ui.import_form, centered_rect(70, 70, screen));
            }
            UIOverlay::ConfirmDelete => ConfirmDeleteOverlay::new().render(
                f,
                ui.pending_delete.as_ref(),
                centered_rect(50, 25, screen),
            ),
        }
    }
}

/// Rectangle of `w_pct` x `h_pct` percent centred in `r`.
pub fn centered_rect(w_pct: u16, h_pct: u16, r: Rect) -> Rect {
    let w = (r.width * w_pct.min(100) / 100).min(r.width);
    let h = (r.height * h_pct.min(100) / 100).min(r.height);
    Rect {
        x: r.x + (r.width - w) / 2,
        y: r.y + (r.height - h) / 2,
        width: w,
        height: h,
    }
}

fn notification_rect(scr: Rect, lvl: NotificationLevel) -> Rect {
    let h = if lvl == NotificationLevel::Error { 5 } else { 3 };
    let w = (scr.width * 40 / 100).max(30).min(scr.width);
    Rect {
        x: scr.x + scr.width - w,
        y: scr.y,
        width: w,
        height: h.min(scr.height),
    }
}
