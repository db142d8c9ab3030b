//! ``src/controller/movie_store.rs``
//! ============================================================================
//! # `MovieStore`: issues backend requests and feeds [`MovieState`]
//!
//! Each operation follows the same shape: mark its slot loading under a short
//! write lock, await the backend with no lock held, then apply the response.
//! Errors are recorded in the operation's own slot and also returned, so the
//! dispatcher can raise a notification. An authorization failure expires the
//! shared [`Session`], unless the token it was sent with has been replaced.
//!
//! A reset (logout, expiry) starts a new container generation. Writes that
//! complete afterwards are not applied and come back as
//! [`OpError::superseded`].

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument, warn};

use crate::api::backend::{ImportUpload, MovieBackend};
use crate::error::{ApiError, ErrorKind, OpError};
use crate::import::catalog::CatalogFile;
use crate::model::movie::{Movie, MovieDraft, MovieId, MoviePatch};
use crate::model::movie_state::{ImportSummary, MovieState, OpKind};
use crate::model::query::{MovieFilters, MovieQuery, QueryPatch, SortField};
use crate::model::session::Session;

pub const NO_VALID_MOVIES: &str = "No valid movies found in file";

/// Session token and container generation a write was started under.
#[derive(Debug)]
struct Issued {
    op: OpKind,
    token: Option<String>,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct MovieStore {
    backend: Arc<dyn MovieBackend>,
    session: Session,
    state: Arc<RwLock<MovieState>>,
    initial_query: MovieQuery,
}

impl MovieStore {
    pub fn new(backend: Arc<dyn MovieBackend>, session: Session, initial_query: MovieQuery) -> Self {
        Self {
            backend,
            session,
            state: Arc::new(RwLock::new(MovieState::new(initial_query.clone()))),
            initial_query,
        }
    }

    /// Read access for selectors. Do not hold across an await.
    pub fn state(&self) -> RwLockReadGuard<'_, MovieState> {
        self.state.read()
    }

    pub fn snapshot(&self) -> MovieState {
        self.state.read().clone()
    }

    /// Back to an empty, uninitialised container (logout). Requests still in
    /// flight become stale.
    pub fn reset(&self) {
        self.state.write().reset(self.initial_query.clone());
    }

    fn classify(&self, err: ApiError, token: Option<&str>) -> OpError {
        if err.is_unauthorized() {
            if self.session.is_replaced(token) {
                debug!("authorization failure for a replaced token ignored");
                return OpError::superseded();
            }
            if self.session.expire_issued(token) {
                warn!("Authorization rejected; session cleared");
            }
        }
        OpError::from(err)
    }

    // ------------------------------------------------------------------
    // listing
    // ------------------------------------------------------------------

    /// Fetch `query`. `Ok(false)` means a newer request superseded this one
    /// and the response was dropped.
    #[instrument(level = "debug", skip(self), fields(sort = query.sort.as_str(), offset = query.offset))]
    pub async fn load(&self, query: MovieQuery) -> Result<bool, OpError> {
        let token = self.session.token();
        let ticket = self.state.write().begin_list(query);
        let result = self
            .backend
            .list_movies(&ticket.query)
            .await
            .map_err(|e| self.classify(e, token.as_deref()));

        let err = result.as_ref().err().cloned();
        let applied = self.state.write().finish_list(ticket, result);
        match err {
            Some(e) if applied => Err(e),
            _ => Ok(applied),
        }
    }

    /// Merge `patch` onto the current (or in-flight) query and fetch it.
    pub async fn load_with(&self, patch: QueryPatch) -> Result<bool, OpError> {
        let merged = self.state.read().base_query().merge(patch);
        match merged {
            Ok(query) => self.load(query).await,
            Err(e) => {
                let err = OpError::new(ErrorKind::Validation, e.to_string());
                self.state.write().fail(OpKind::List, err.clone());
                Err(err)
            }
        }
    }

    /// Reload the remembered query.
    pub async fn refresh(&self) -> Result<bool, OpError> {
        let query = self.state.read().base_query().clone();
        self.load(query).await
    }

    pub async fn next_page(&self) -> Result<bool, OpError> {
        let next = {
            let state = self.state.read();
            state.base_query().next_page(state.total())
        };
        match next {
            Some(query) => self.load(query).await,
            None => Ok(false),
        }
    }

    pub async fn prev_page(&self) -> Result<bool, OpError> {
        let prev = self.state.read().base_query().prev_page();
        match prev {
            Some(query) => self.load(query).await,
            None => Ok(false),
        }
    }

    pub async fn set_sort(&self, sort: SortField) -> Result<bool, OpError> {
        let query = self.state.read().base_query().sorted_by(sort);
        self.load(query).await
    }

    /// Advance to the sort after the one most recently requested.
    pub async fn cycle_sort(&self) -> Result<bool, OpError> {
        let query = {
            let state = self.state.read();
            let base = state.base_query();
            base.sorted_by(base.sort.next())
        };
        self.load(query).await
    }

    pub async fn toggle_order(&self) -> Result<bool, OpError> {
        let query = {
            let state = self.state.read();
            let base = state.base_query();
            base.ordered(base.order.toggled())
        };
        self.load(query).await
    }

    pub async fn search(&self, filters: MovieFilters) -> Result<bool, OpError> {
        let query = self.state.read().base_query().searched(filters);
        self.load(query).await
    }

    pub async fn clear_search(&self) -> Result<bool, OpError> {
        let query = self.state.read().base_query().cleared();
        self.load(query).await
    }

    // ------------------------------------------------------------------
    // single records
    // ------------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub async fn load_by_id(&self, id: MovieId) -> Result<bool, OpError> {
        let token = self.session.token();
        let ticket = self.state.write().begin_detail(id);
        let result = self
            .backend
            .get_movie(&ticket.id)
            .await
            .map_err(|e| self.classify(e, token.as_deref()));

        let err = result.as_ref().err().cloned();
        let applied = self.state.write().finish_detail(ticket, result);
        match err {
            Some(e) if applied => Err(e),
            _ => Ok(applied),
        }
    }

    pub fn clear_selection(&self) {
        self.state.write().clear_selection();
    }

    /// Validate, then submit. Invalid drafts never reach the backend.
    #[instrument(level = "info", skip_all, fields(title = %draft.title))]
    pub async fn create(&self, draft: MovieDraft, current_year: i32) -> Result<Movie, OpError> {
        if let Err(e) = draft.validate(current_year) {
            self.state.write().fail(OpKind::Create, e.clone());
            return Err(e);
        }

        let issued = self.issue(OpKind::Create);
        match self.backend.create_movie(&draft).await {
            Ok(movie) => {
                let mut state = self.state.write();
                if state.generation() != issued.generation {
                    debug!(id = %movie.id, "container reset; created movie dropped");
                    return Err(OpError::superseded());
                }
                info!(id = %movie.id, "movie created");
                state.apply_created(movie.clone());
                Ok(movie)
            }
            Err(e) => Err(self.fail(&issued, e)),
        }
    }

    #[instrument(level = "info", skip(self, patch))]
    pub async fn update(
        &self,
        id: MovieId,
        patch: MoviePatch,
        current_year: i32,
    ) -> Result<Movie, OpError> {
        if let Err(e) = patch.validate(current_year) {
            self.state.write().fail(OpKind::Update, e.clone());
            return Err(e);
        }

        let issued = self.issue(OpKind::Update);
        match self.backend.update_movie(&id, &patch).await {
            Ok(movie) => {
                let mut state = self.state.write();
                if state.generation() != issued.generation {
                    return Err(OpError::superseded());
                }
                state.apply_updated(movie.clone());
                Ok(movie)
            }
            Err(e) => Err(self.fail(&issued, e)),
        }
    }

    #[instrument(level = "info", skip(self))]
    pub async fn remove(&self, id: MovieId) -> Result<(), OpError> {
        let issued = self.issue(OpKind::Delete);
        match self.backend.delete_movie(&id).await {
            Ok(()) => {
                let mut state = self.state.write();
                if state.generation() != issued.generation {
                    return Err(OpError::superseded());
                }
                info!("movie deleted");
                state.apply_removed(&id);
                Ok(())
            }
            Err(e) => Err(self.fail(&issued, e)),
        }
    }

    /// Upload a previewed catalog. Files with no parseable record are refused
    /// locally.
    #[instrument(level = "info", skip_all, fields(file = %file.file_name))]
    pub async fn import_catalog(&self, file: &CatalogFile) -> Result<ImportSummary, OpError> {
        if !file.outcome.has_movies() {
            let err = OpError::new(ErrorKind::Validation, NO_VALID_MOVIES);
            self.state.write().fail(OpKind::Import, err.clone());
            return Err(err);
        }

        let parse_errors = file.outcome.errors.iter().map(ToString::to_string).collect();
        let upload = ImportUpload {
            file_name: file.file_name.clone(),
            bytes: file.bytes.clone(),
        };
        self.import_batch(&upload, parse_errors).await
    }

    pub async fn import_batch(
        &self,
        upload: &ImportUpload,
        parse_errors: Vec<String>,
    ) -> Result<ImportSummary, OpError> {
        let issued = self.issue(OpKind::Import);
        match self.backend.import_movies(upload).await {
            Ok(receipt) => {
                let mut state = self.state.write();
                if state.generation() != issued.generation {
                    debug!("container reset; import receipt dropped");
                    return Err(OpError::superseded());
                }
                let merged = state.apply_imported(receipt, parse_errors);
                info!(merged, "import applied");
                Ok(state.import_summary().cloned().unwrap_or_default())
            }
            Err(e) => Err(self.fail(&issued, e)),
        }
    }

    pub fn clear_error(&self, op: OpKind) {
        self.state.write().clear_error(op);
    }

    pub fn clear_import_summary(&self) {
        self.state.write().clear_import_summary();
    }

    fn issue(&self, op: OpKind) -> Issued {
        let generation = {
            let mut state = self.state.write();
            state.begin(op);
            state.generation()
        };
        Issued {
            op,
            token: self.session.token(),
            generation,
        }
    }

    fn fail(&self, issued: &Issued, err: ApiError) -> OpError {
        let err = self.classify(err, issued.token.as_deref());
        let mut state = self.state.write();
        if state.generation() != issued.generation || err.is_superseded() {
            debug!(op = issued.op.label(), "container reset; failure dropped");
            return OpError::superseded();
        }
        warn!(op = issued.op.label(), error = %err, "operation failed");
        state.fail(issued.op, err.clone());
        err
    }
}
