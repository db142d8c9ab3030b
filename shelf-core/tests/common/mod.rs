//! Scripted in-memory backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use shelf_core::api::backend::{
    ApiResult, ImportReceipt, ImportUpload, LoginRequest, MovieBackend, MoviePage, RegisterRequest,
};
use shelf_core::api::{MemoryTokenStore, TokenStore};
use shelf_core::controller::{AuthStore, MovieStore};
use shelf_core::error::ApiError;
use shelf_core::model::movie::{Movie, MovieDraft, MovieFormat, MovieId, MoviePatch};
use shelf_core::model::query::MovieQuery;
use shelf_core::model::Session;

/// One queued response, optionally held back until the gate fires.
#[derive(Debug)]
struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: ApiResult<T>,
}

#[derive(Debug, Default)]
struct Script {
    tokens: VecDeque<ApiResult<String>>,
    lists: VecDeque<Scripted<MoviePage>>,
    details: VecDeque<ApiResult<Movie>>,
    writes: VecDeque<Scripted<Movie>>,
    deletes: VecDeque<ApiResult<()>>,
    imports: VecDeque<Scripted<ImportReceipt>>,
    calls: Vec<&'static str>,
    queries: Vec<MovieQuery>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    script: Mutex<Script>,
}

fn unscripted<T>(endpoint: &str) -> ApiResult<T> {
    Err(ApiError::Transport(format!("no scripted response for {endpoint}")))
}

async fn deliver<T>(next: Option<Scripted<T>>, endpoint: &str) -> ApiResult<T> {
    let Some(Scripted { gate, result }) = next else {
        return unscripted(endpoint);
    };
    if let Some(gate) = gate {
        let _ = gate.await;
    }
    result
}

impl FakeBackend {
    pub fn push_token(&self, result: ApiResult<String>) {
        self.script.lock().tokens.push_back(result);
    }

    pub fn push_list(&self, result: ApiResult<MoviePage>) {
        self.script
            .lock()
            .lists
            .push_back(Scripted { gate: None, result });
    }

    /// Queue a list response that is only delivered once `gate` fires.
    pub fn push_list_gated(&self, gate: oneshot::Receiver<()>, result: ApiResult<MoviePage>) {
        self.script.lock().lists.push_back(Scripted {
            gate: Some(gate),
            result,
        });
    }

    pub fn push_detail(&self, result: ApiResult<Movie>) {
        self.script.lock().details.push_back(result);
    }

    /// Response for the next create or update.
    pub fn push_write(&self, result: ApiResult<Movie>) {
        self.script
            .lock()
            .writes
            .push_back(Scripted { gate: None, result });
    }

    pub fn push_write_gated(&self, gate: oneshot::Receiver<()>, result: ApiResult<Movie>) {
        self.script.lock().writes.push_back(Scripted {
            gate: Some(gate),
            result,
        });
    }

    pub fn push_delete(&self, result: ApiResult<()>) {
        self.script.lock().deletes.push_back(result);
    }

    pub fn push_import(&self, result: ApiResult<ImportReceipt>) {
        self.script
            .lock()
            .imports
            .push_back(Scripted { gate: None, result });
    }

    pub fn push_import_gated(
        &self,
        gate: oneshot::Receiver<()>,
        result: ApiResult<ImportReceipt>,
    ) {
        self.script.lock().imports.push_back(Scripted {
            gate: Some(gate),
            result,
        });
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.script.lock().calls.clone()
    }

    pub fn queries(&self) -> Vec<MovieQuery> {
        self.script.lock().queries.clone()
    }

    fn record(&self, call: &'static str) {
        self.script.lock().calls.push(call);
    }
}

#[async_trait]
impl MovieBackend for FakeBackend {
    async fn register(&self, _request: &RegisterRequest) -> ApiResult<String> {
        self.record("register");
        let next = self.script.lock().tokens.pop_front();
        next.unwrap_or_else(|| unscripted("register"))
    }

    async fn login(&self, _request: &LoginRequest) -> ApiResult<String> {
        self.record("login");
        let next = self.script.lock().tokens.pop_front();
        next.unwrap_or_else(|| unscripted("login"))
    }

    async fn list_movies(&self, query: &MovieQuery) -> ApiResult<MoviePage> {
        let next = {
            let mut script = self.script.lock();
            script.calls.push("list");
            script.queries.push(query.clone());
            script.lists.pop_front()
        };
        deliver(next, "list").await
    }

    async fn get_movie(&self, _id: &MovieId) -> ApiResult<Movie> {
        self.record("get");
        let next = self.script.lock().details.pop_front();
        next.unwrap_or_else(|| unscripted("get"))
    }

    async fn create_movie(&self, _draft: &MovieDraft) -> ApiResult<Movie> {
        self.record("create");
        let next = self.script.lock().writes.pop_front();
        deliver(next, "create").await
    }

    async fn update_movie(&self, _id: &MovieId, _patch: &MoviePatch) -> ApiResult<Movie> {
        self.record("update");
        let next = self.script.lock().writes.pop_front();
        deliver(next, "update").await
    }

    async fn delete_movie(&self, _id: &MovieId) -> ApiResult<()> {
        self.record("delete");
        let next = self.script.lock().deletes.pop_front();
        next.unwrap_or_else(|| unscripted("delete"))
    }

    async fn import_movies(&self, _upload: &ImportUpload) -> ApiResult<ImportReceipt> {
        self.record("import");
        let next = self.script.lock().imports.pop_front();
        deliver(next, "import").await
    }
}

pub fn movie(id: &str) -> Movie {
    Movie {
        id: id.to_owned(),
        title: format!("Movie {id}"),
        year: 2001,
        format: MovieFormat::Dvd,
        actors: vec!["Someone".to_owned()],
        created_at: None,
        updated_at: None,
    }
}

pub fn page(ids: &[&str], total: u64) -> MoviePage {
    MoviePage {
        movies: ids.iter().map(|id| movie(id)).collect(),
        total,
    }
}

pub fn ids(store: &MovieStore) -> Vec<String> {
    store.state().movies().iter().map(|m| m.id.clone()).collect()
}

/// Everything a test needs, wired the way `main` wires it.
pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub tokens: Arc<MemoryTokenStore>,
    pub session: Session,
    pub movies: MovieStore,
    pub auth: AuthStore,
}

impl Harness {
    pub fn new(query: MovieQuery) -> Self {
        Self::with_tokens(Arc::new(MemoryTokenStore::default()), query)
    }

    /// Already signed in with a stored token.
    pub fn signed_in(query: MovieQuery) -> Self {
        let harness = Self::with_tokens(Arc::new(MemoryTokenStore::with_token("tok")), query);
        assert!(harness.session.restore());
        harness
    }

    fn with_tokens(tokens: Arc<MemoryTokenStore>, query: MovieQuery) -> Self {
        let backend = Arc::new(FakeBackend::default());
        let store: Arc<dyn TokenStore> = tokens.clone();
        let session = Session::new(store);
        let api: Arc<dyn MovieBackend> = backend.clone();
        let movies = MovieStore::new(api.clone(), session.clone(), query);
        let auth = AuthStore::new(api, session.clone(), movies.clone());
        Self {
            backend,
            tokens,
            session,
            movies,
            auth,
        }
    }
}
