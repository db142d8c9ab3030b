//! View-only state: overlays, forms, notifications and redraw flags

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use compact_str::CompactString;

use crate::model::form::{AuthForm, ImportForm, MovieForm};
use crate::model::movie::{Movie, MovieId};
use crate::model::search_state::SearchDebouncer;
use crate::util::debounce::DebounceConfig;

/// Atomic redraw flags for lock-free UI updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    StatusBar = 2,
    Overlay = 4,
    Notification = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Where keystrokes go when no overlay is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIMode {
    #[default]
    Browse = 0,
    Search = 1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    Details = 2,
    MovieForm = 3,
    Import = 4,
    ConfirmDelete = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

/// Compact notification with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn expired(&self, now: Instant) -> bool {
        self.auto_dismiss
            .is_some_and(|d| now.saturating_duration_since(self.timestamp) >= d)
    }
}

/// Movie waiting for delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: MovieId,
    pub title: String,
}

#[derive(Debug)]
pub struct UIState {
    pub redraw_flags: AtomicU32,
    pub frame_count: AtomicU64,

    pub mode: UIMode,
    pub overlay: UIOverlay,

    /// Highlighted row of the movie table.
    pub selected: usize,

    pub notification: Option<Notification>,
    pub notification_timeout: Duration,

    pub auth_form: AuthForm,
    pub movie_form: MovieForm,
    pub import_form: ImportForm,
    pub search: SearchDebouncer,
    pub pending_delete: Option<PendingDelete>,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), DebounceConfig::search_input())
    }
}

impl UIState {
    pub fn new(notification_timeout: Duration, debounce: DebounceConfig) -> Self {
        Self {
            redraw_flags: AtomicU32::new(u32::from(RedrawFlag::All.bits())),
            frame_count: AtomicU64::new(0),
            mode: UIMode::Browse,
            overlay: UIOverlay::None,
            selected: 0,
            notification: None,
            notification_timeout,
            auth_form: AuthForm::default(),
            movie_form: MovieForm::default(),
            import_form: ImportForm::default(),
            search: SearchDebouncer::new(debounce),
            pending_delete: None,
        }
    }

    // Atomic redraw operations
    #[inline]
    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.redraw_flags
            .fetch_or(u32::from(flag.bits()), Ordering::Relaxed);
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_flags.load(Ordering::Relaxed) != 0
    }

    #[inline]
    pub fn clear_redraw(&self) {
        self.redraw_flags.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_frame(&self) {
        self.frame_count.fetch_add(1, Ordering::Relaxed);
    }

    // Selection
    pub fn move_selection_up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.request_redraw(RedrawFlag::Main);
        true
    }

    pub fn move_selection_down(&mut self, len: usize) -> bool {
        if self.selected + 1 >= len {
            return false;
        }
        self.selected += 1;
        self.request_redraw(RedrawFlag::Main);
        true
    }

    /// Keep the highlight inside a list that just changed length.
    pub const fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // Notifications
    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss: Option<Duration>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss,
        });
        self.request_redraw(RedrawFlag::Notification);
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info, Some(self.notification_timeout));
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(
            message,
            NotificationLevel::Success,
            Some(self.notification_timeout),
        );
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(
            message,
            NotificationLevel::Warning,
            Some(self.notification_timeout * 2),
        );
    }

    /// Errors stay until dismissed.
    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, None);
    }

    pub fn dismiss_notification(&mut self) -> bool {
        if self.notification.take().is_some() {
            self.request_redraw(RedrawFlag::Notification);
            return true;
        }
        false
    }

    /// Drop an auto-dismissing notification whose time is up.
    pub fn update_notification(&mut self, now: Instant) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.expired(now)) {
            self.notification = None;
            self.request_redraw(RedrawFlag::Notification);
            return true;
        }
        false
    }

    // Overlays
    pub fn open_overlay(&mut self, overlay: UIOverlay) {
        self.overlay = overlay;
        self.mode = UIMode::Browse;
        self.request_redraw(RedrawFlag::Overlay);
    }

    pub fn close_overlay(&mut self) {
        self.overlay = UIOverlay::None;
        self.pending_delete = None;
        self.request_redraw(RedrawFlag::All);
    }

    pub fn open_movie_form(&mut self, editing: Option<&Movie>) {
        self.movie_form = editing.map_or_else(MovieForm::default, MovieForm::for_edit);
        self.open_overlay(UIOverlay::MovieForm);
    }

    pub fn open_import(&mut self) {
        self.import_form = ImportForm::default();
        self.open_overlay(UIOverlay::Import);
    }

    pub fn get_overlay_title(&self) -> &'static str {
        match self.overlay {
            UIOverlay::None => "",
            UIOverlay::Help => "Help",
            UIOverlay::Details => "Movie Details",
            UIOverlay::MovieForm if self.movie_form.editing.is_some() => "Edit Movie",
            UIOverlay::MovieForm => "Add Movie",
            UIOverlay::Import => "Import Movies",
            UIOverlay::ConfirmDelete => "Delete Movie",
        }
    }

    pub const fn overlay_accepts_input(&self) -> bool {
        matches!(self.overlay, UIOverlay::MovieForm | UIOverlay::Import)
    }

    /// Back to a clean slate after logout or session expiry.
    pub fn reset_session_views(&mut self) {
        self.overlay = UIOverlay::None;
        self.mode = UIMode::Browse;
        self.selected = 0;
        self.pending_delete = None;
        self.movie_form = MovieForm::default();
        self.import_form = ImportForm::default();
        self.search.reset();
        self.auth_form.clear_secrets();
        self.request_redraw(RedrawFlag::All);
    }
}
