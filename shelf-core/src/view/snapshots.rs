//! src/view/snapshots.rs
//! ============================================================
//! Immutable data-transfer structs harvested from the live
//! states (`UIState`, `MovieState`, `AuthState`) while their
//! locks are held briefly, and consumed by widgets after all
//! locks have been released.
//!
//! Every snapshot is `Clone + Send + Sync` with no interior
//! mutability, so no widget can re-enter a lock while drawing.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::controller::state_coordinator::StateCoordinator;
use crate::error::OpError;
use crate::model::auth_state::AuthState;
use crate::model::form::{AuthForm, ImportForm, MovieForm};
use crate::model::movie::Movie;
use crate::model::movie_state::{ImportSummary, MovieState, OpKind};
use crate::model::query::{MovieFilters, Pagination, SortField, SortOrder};
use crate::model::search_state::SearchInput;
use crate::model::ui_state::{Notification, PendingDelete, UIMode, UIOverlay, UIState};

// ------------------------------------------------------------
// UiSnapshot
// ------------------------------------------------------------

/// Slice of the live UI state, captured once per frame.
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub overlay: UIOverlay,
    pub overlay_title: &'static str,
    pub mode: UIMode,

    /// Highlighted table row
    pub selected: usize,

    pub notification: Option<Notification>,

    /// Bit-flags requested by the logic layer
    pub redraw_flags: u32,

    /// Text, type and format of the search bar
    pub search: SearchInput,

    /// Search input typed but not yet applied
    pub search_pending: bool,

    pub auth_form: AuthForm,
    pub movie_form: MovieForm,
    pub import_form: ImportForm,
    pub pending_delete: Option<PendingDelete>,
}

impl From<&UIState> for UiSnapshot {
    fn from(src: &UIState) -> Self {
        Self {
            overlay: src.overlay,
            overlay_title: src.get_overlay_title(),
            mode: src.mode,
            selected: src.selected,
            notification: src.notification.clone(),
            redraw_flags: src.redraw_flags.load(Ordering::Relaxed),
            search: src.search.input().clone(),
            search_pending: src.search.deadline().is_some(),
            auth_form: src.auth_form.clone(),
            movie_form: src.movie_form.clone(),
            import_form: src.import_form.clone(),
            pending_delete: src.pending_delete.clone(),
        }
    }
}

// ------------------------------------------------------------
// MovieSnapshot
// ------------------------------------------------------------

/// Everything the table, status bar and details overlay show.
#[derive(Debug, Clone)]
pub struct MovieSnapshot {
    pub movies: Arc<[Movie]>,
    pub total: u64,
    pub pagination: Pagination,
    pub sort: SortField,
    pub order: SortOrder,
    pub filters: MovieFilters,
    pub initialized: bool,

    /// A list request is in flight
    pub loading: bool,

    pub list_error: Option<OpError>,

    /// Record loaded for the details overlay
    pub details: Option<Movie>,
    pub details_loading: bool,
    pub details_error: Option<OpError>,

    /// First error among create / update / delete / import
    pub write_error: Option<OpError>,
    pub busy: bool,

    pub import_summary: Option<ImportSummary>,
}

impl From<&MovieState> for MovieSnapshot {
    fn from(state: &MovieState) -> Self {
        let query = state.query();
        let writes = [OpKind::Create, OpKind::Update, OpKind::Delete, OpKind::Import];
        Self {
            movies: Arc::from(state.movies()),
            total: state.total(),
            pagination: state.pagination(),
            sort: query.sort,
            order: query.order,
            filters: query.filters.clone(),
            initialized: state.initialized(),
            loading: state.is_loading(OpKind::List),
            list_error: state.error(OpKind::List).cloned(),
            details: state.selected().cloned(),
            details_loading: state.is_loading(OpKind::Detail),
            details_error: state.error(OpKind::Detail).cloned(),
            write_error: writes.iter().find_map(|op| state.error(*op)).cloned(),
            busy: writes.iter().any(|op| state.is_loading(*op)),
            import_summary: state.import_summary().cloned(),
        }
    }
}

impl MovieSnapshot {
    /// "Page x of y".
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {}",
            self.pagination.current_page(),
            self.pagination.total_pages()
        )
    }

    /// "Title ↑" style label for the active sort.
    pub fn sort_label(&self) -> String {
        let arrow = match self.order {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        };
        format!("{} {arrow}", sort_name(self.sort))
    }
}

pub const fn sort_name(sort: SortField) -> &'static str {
    match sort {
        SortField::Id => "Added",
        SortField::Title => "Title",
        SortField::Year => "Year",
    }
}

// ------------------------------------------------------------
// FrameSnapshot
// ------------------------------------------------------------

/// All three snapshots for one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub ui: UiSnapshot,
    pub movies: MovieSnapshot,
    pub auth: AuthState,
}

impl FrameSnapshot {
    /// Take each lock in turn, never two at once.
    pub fn capture(coord: &StateCoordinator) -> Self {
        let ui = UiSnapshot::from(&*coord.ui_state());
        let movies = MovieSnapshot::from(&*coord.movies.state());
        let auth = coord.auth.snapshot();
        Self { ui, movies, auth }
    }
}
