//! ``src/model/movie_state.rs``
//! ============================================================================
//! # `MovieState`: the in-memory snapshot and its reducers
//!
//! Holds the current page of movies, the collection total, the query that
//! produced them, the selected (detail) movie, and one loading/error slot per
//! operation kind so concurrent operations never overwrite each other's flags.
//!
//! All mutation goes through the `begin_*` / `finish_*` / `apply_*` methods.
//! List and detail requests are stamped with a sequence number; a response
//! whose ticket is no longer the latest is discarded.
//!
//! Create and import insert returned movies at the front of the page without
//! refetching, so the page can disagree with the server's sort order until the
//! next reload. A manual refresh reissues the remembered query.

use enum_map::{Enum, EnumMap};
use tracing::{debug, trace};

use crate::api::backend::{ImportReceipt, MoviePage};
use crate::error::OpError;
use crate::model::movie::{Movie, MovieId};
use crate::model::query::{MovieQuery, Pagination};

/// Operation kinds with their own loading/error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum OpKind {
    List,
    Detail,
    Create,
    Update,
    Delete,
    Import,
}

impl OpKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::List => "load movies",
            Self::Detail => "load movie",
            Self::Create => "create movie",
            Self::Update => "update movie",
            Self::Delete => "delete movie",
            Self::Import => "import movies",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStatus {
    pub loading: bool,
    pub error: Option<OpError>,
}

/// Stamp for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicket {
    pub seq: u64,
    pub query: MovieQuery,
}

/// Stamp for a detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub id: MovieId,
}

/// Outcome of an import, kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: u64,
    pub imported: u64,
    pub failed: u64,
    /// Movies newly added to the visible page.
    pub merged: usize,
    /// Client-side parse errors from the preview, if any.
    pub parse_errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MovieState {
    movies: Vec<Movie>,
    total: u64,
    query: MovieQuery,
    initialized: bool,
    selected: Option<Movie>,
    import_summary: Option<ImportSummary>,
    ops: EnumMap<OpKind, OpStatus>,
    list_seq: u64,
    detail_seq: u64,
    /// Bumped on every reset; writes begun under an older value are dropped.
    generation: u64,
    pending_query: Option<MovieQuery>,
}

impl Default for MovieState {
    fn default() -> Self {
        Self::new(MovieQuery::default())
    }
}

impl MovieState {
    pub fn new(query: MovieQuery) -> Self {
        Self {
            movies: Vec::new(),
            total: 0,
            query,
            initialized: false,
            selected: None,
            import_summary: None,
            ops: EnumMap::default(),
            list_seq: 0,
            detail_seq: 0,
            generation: 0,
            pending_query: None,
        }
    }

    /// Empty the container for a new session. Request counters keep
    /// counting so nothing issued before the reset can still apply.
    pub fn reset(&mut self, query: MovieQuery) {
        let fresh = Self {
            list_seq: self.list_seq + 1,
            detail_seq: self.detail_seq + 1,
            generation: self.generation + 1,
            ..Self::new(query)
        };
        *self = fresh;
    }

    // ------------------------------------------------------------------
    // selectors
    // ------------------------------------------------------------------

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Query of the last successful load.
    pub const fn query(&self) -> &MovieQuery {
        &self.query
    }

    /// Query the next merge should start from: the in-flight one if any.
    pub fn base_query(&self) -> &MovieQuery {
        self.pending_query.as_ref().unwrap_or(&self.query)
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn initialized(&self) -> bool {
        self.initialized
    }

    pub const fn selected(&self) -> Option<&Movie> {
        self.selected.as_ref()
    }

    pub const fn import_summary(&self) -> Option<&ImportSummary> {
        self.import_summary.as_ref()
    }

    pub const fn pagination(&self) -> Pagination {
        self.query.pagination(self.total)
    }

    pub fn status(&self, op: OpKind) -> &OpStatus {
        &self.ops[op]
    }

    pub fn is_loading(&self, op: OpKind) -> bool {
        self.ops[op].loading
    }

    pub fn error(&self, op: OpKind) -> Option<&OpError> {
        self.ops[op].error.as_ref()
    }

    pub fn find(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    // ------------------------------------------------------------------
    // list
    // ------------------------------------------------------------------

    pub fn begin_list(&mut self, query: MovieQuery) -> ListTicket {
        self.list_seq += 1;
        self.pending_query = Some(query.clone());
        self.ops[OpKind::List] = OpStatus {
            loading: true,
            error: None,
        };
        trace!(seq = self.list_seq, "list request issued");
        ListTicket {
            seq: self.list_seq,
            query,
        }
    }

    /// Apply a list response. Returns `false` when the response was stale and
    /// therefore dropped. Failures leave the previous page in place.
    pub fn finish_list(&mut self, ticket: ListTicket, result: Result<MoviePage, OpError>) -> bool {
        if ticket.seq != self.list_seq {
            debug!(
                seq = ticket.seq,
                latest = self.list_seq,
                "discarding stale list response"
            );
            return false;
        }

        self.pending_query = None;
        let status = &mut self.ops[OpKind::List];
        status.loading = false;
        match result {
            Ok(page) => {
                status.error = None;
                self.movies = page.movies;
                self.total = page.total;
                self.query = ticket.query;
                self.initialized = true;
            }
            Err(err) => status.error = Some(err),
        }
        true
    }

    // ------------------------------------------------------------------
    // detail
    // ------------------------------------------------------------------

    pub fn begin_detail(&mut self, id: MovieId) -> DetailTicket {
        self.detail_seq += 1;
        if self.selected.as_ref().is_some_and(|m| m.id != id) {
            self.selected = None;
        }
        self.ops[OpKind::Detail] = OpStatus {
            loading: true,
            error: None,
        };
        DetailTicket {
            seq: self.detail_seq,
            id,
        }
    }

    pub fn finish_detail(&mut self, ticket: DetailTicket, result: Result<Movie, OpError>) -> bool {
        if ticket.seq != self.detail_seq {
            debug!(id = %ticket.id, "discarding stale detail response");
            return false;
        }
        let status = &mut self.ops[OpKind::Detail];
        status.loading = false;
        match result {
            Ok(movie) => {
                status.error = None;
                self.selected = Some(movie);
            }
            Err(err) => status.error = Some(err),
        }
        true
    }

    /// Leave the detail view: forget the selection and its error, and make
    /// any detail response still in flight stale.
    pub fn clear_selection(&mut self) {
        self.detail_seq += 1;
        self.selected = None;
        self.ops[OpKind::Detail] = OpStatus::default();
    }

    // ------------------------------------------------------------------
    // single-record operations
    // ------------------------------------------------------------------

    pub fn begin(&mut self, op: OpKind) {
        self.ops[op] = OpStatus {
            loading: true,
            error: None,
        };
    }

    pub fn fail(&mut self, op: OpKind, err: OpError) {
        self.ops[op] = OpStatus {
            loading: false,
            error: Some(err),
        };
    }

    fn succeed(&mut self, op: OpKind) {
        self.ops[op] = OpStatus::default();
    }

    pub fn clear_error(&mut self, op: OpKind) {
        self.ops[op].error = None;
    }

    /// New movie goes to the front of the page and the total grows by one.
    /// A movie whose id is already present is replaced instead.
    pub fn apply_created(&mut self, movie: Movie) {
        self.succeed(OpKind::Create);
        if let Some(existing) = self.movies.iter_mut().find(|m| m.id == movie.id) {
            *existing = movie;
            return;
        }
        self.movies.insert(0, movie);
        self.total += 1;
    }

    pub fn apply_updated(&mut self, movie: Movie) {
        self.succeed(OpKind::Update);
        if let Some(existing) = self.movies.iter_mut().find(|m| m.id == movie.id) {
            *existing = movie.clone();
        }
        if self.selected.as_ref().is_some_and(|s| s.id == movie.id) {
            self.selected = Some(movie);
        }
    }

    pub fn apply_removed(&mut self, id: &str) {
        self.succeed(OpKind::Delete);
        self.movies.retain(|m| m.id != id);
        self.total = self.total.saturating_sub(1);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.clear_selection();
        }
    }

    /// Merge imported movies that are not already on the page, front first,
    /// and record the summary. Returns how many were merged.
    pub fn apply_imported(&mut self, receipt: ImportReceipt, parse_errors: Vec<String>) -> usize {
        self.succeed(OpKind::Import);

        let mut fresh: Vec<Movie> = Vec::new();
        for movie in receipt.movies {
            let known = self.movies.iter().any(|m| m.id == movie.id)
                || fresh.iter().any(|m| m.id == movie.id);
            if !known {
                fresh.push(movie);
            }
        }
        let merged = fresh.len();
        self.total += merged as u64;
        self.movies.splice(0..0, fresh);

        let imported = receipt.imported.min(receipt.total);
        self.import_summary = Some(ImportSummary {
            total: receipt.total,
            imported,
            failed: receipt.total - imported,
            merged,
            parse_errors,
        });
        merged
    }

    pub fn clear_import_summary(&mut self) {
        self.import_summary = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::movie::MovieFormat;
    use crate::model::query::SortField;

    fn movie(id: &str) -> Movie {
        Movie {
            id: id.to_owned(),
            title: format!("Movie {id}"),
            year: 2000,
            format: MovieFormat::Dvd,
            actors: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn page(ids: &[&str], total: u64) -> MoviePage {
        MoviePage {
            movies: ids.iter().map(|id| movie(id)).collect(),
            total,
        }
    }

    fn loaded(ids: &[&str], total: u64) -> MovieState {
        let mut state = MovieState::default();
        let ticket = state.begin_list(MovieQuery::default());
        assert!(state.finish_list(ticket, Ok(page(ids, total))));
        state
    }

    #[test]
    fn successful_load_replaces_snapshot() {
        let state = loaded(&["1", "2"], 12);
        assert!(state.initialized());
        assert_eq!(state.movies().len(), 2);
        assert_eq!(state.total(), 12);
        assert!(!state.is_loading(OpKind::List));
    }

    #[test]
    fn reset_makes_earlier_requests_stale() {
        let mut state = loaded(&["1"], 1);
        let list = state.begin_list(MovieQuery::default());
        let detail = state.begin_detail("1".into());
        let generation = state.generation();

        state.reset(MovieQuery::default());
        assert!(!state.initialized());
        assert_ne!(state.generation(), generation);

        let fresh = state.begin_list(MovieQuery::default());
        assert_ne!(fresh.seq, list.seq);
        assert!(!state.finish_list(list, Ok(page(&["old"], 1))));
        assert!(!state.finish_detail(detail, Ok(movie("1"))));
        assert!(state.finish_list(fresh, Ok(page(&["new"], 1))));
        assert_eq!(state.movies()[0].id, "new");
        assert!(state.selected().is_none());
    }

    #[test]
    fn failed_load_keeps_previous_list() {
        let mut state = loaded(&["1", "2"], 2);
        let ticket = state.begin_list(MovieQuery::default().sorted_by(SortField::Year));
        state.finish_list(ticket, Err(OpError::new(ErrorKind::Network, "down")));

        assert_eq!(state.movies().len(), 2);
        assert_eq!(state.query().sort, SortField::Title);
        assert_eq!(state.error(OpKind::List).unwrap().kind, ErrorKind::Network);
        assert!(!state.is_loading(OpKind::List));
    }

    #[test]
    fn stale_list_response_is_discarded() {
        let mut state = MovieState::default();
        let slow = state.begin_list(MovieQuery::default());
        let fast = state.begin_list(MovieQuery::default().sorted_by(SortField::Year));

        assert!(state.finish_list(fast, Ok(page(&["new"], 1))));
        assert!(!state.finish_list(slow, Ok(page(&["old"], 1))));
        assert_eq!(state.movies()[0].id, "new");
        assert_eq!(state.query().sort, SortField::Year);
    }

    #[test]
    fn operation_flags_are_independent() {
        let mut state = loaded(&["1"], 1);
        state.begin(OpKind::Create);
        state.fail(OpKind::Delete, OpError::new(ErrorKind::Server, "NOPE"));
        let detail = state.begin_detail("1".into());
        state.finish_detail(detail, Err(OpError::new(ErrorKind::Network, "x")));

        assert!(state.is_loading(OpKind::Create));
        assert!(state.error(OpKind::Delete).is_some());
        assert!(state.error(OpKind::List).is_none());
        assert_eq!(state.movies().len(), 1);
    }

    #[test]
    fn clearing_selection_invalidates_inflight_detail() {
        let mut state = loaded(&["1"], 1);
        let ticket = state.begin_detail("1".into());
        state.clear_selection();
        assert!(!state.finish_detail(ticket, Ok(movie("1"))));
        assert!(state.selected().is_none());
    }

    #[test]
    fn create_prepends_once() {
        let mut state = loaded(&["1", "2"], 2);
        state.apply_created(movie("3"));
        state.apply_created(movie("3"));
        assert_eq!(state.total(), 3);
        assert_eq!(state.movies()[0].id, "3");
        assert_eq!(state.movies().iter().filter(|m| m.id == "3").count(), 1);
    }

    #[test]
    fn update_refreshes_list_and_selection() {
        let mut state = loaded(&["1", "2"], 2);
        let ticket = state.begin_detail("2".into());
        state.finish_detail(ticket, Ok(movie("2")));

        let mut renamed = movie("2");
        renamed.title = "Renamed".into();
        state.apply_updated(renamed);

        assert_eq!(state.movies()[1].title, "Renamed");
        assert_eq!(state.selected().unwrap().title, "Renamed");
    }

    #[test]
    fn remove_clears_selection_and_floors_total() {
        let mut state = loaded(&["1"], 1);
        let ticket = state.begin_detail("1".into());
        state.finish_detail(ticket, Ok(movie("1")));

        state.apply_removed("1");
        assert!(state.selected().is_none());
        assert_eq!(state.total(), 0);
        state.apply_removed("1");
        assert_eq!(state.total(), 0);
    }

    #[test]
    fn import_merges_only_unknown_ids() {
        let mut state = loaded(&["1", "2"], 2);
        let receipt = ImportReceipt {
            movies: vec![movie("2"), movie("3"), movie("4"), movie("3")],
            imported: 3,
            total: 5,
        };
        let merged = state.apply_imported(receipt, vec!["Block 5: bad".into()]);

        assert_eq!(merged, 2);
        assert_eq!(state.total(), 4);
        let ids: Vec<&str> = state.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "1", "2"]);

        let summary = state.import_summary().unwrap();
        assert_eq!((summary.total, summary.imported, summary.failed), (5, 3, 2));
        assert_eq!(summary.parse_errors.len(), 1);
    }

    #[test]
    fn import_summary_never_reports_more_imported_than_total() {
        let mut state = MovieState::default();
        state.apply_imported(
            ImportReceipt {
                movies: Vec::new(),
                imported: 9,
                total: 3,
            },
            Vec::new(),
        );
        let summary = state.import_summary().unwrap();
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.failed, 0);
    }
}
