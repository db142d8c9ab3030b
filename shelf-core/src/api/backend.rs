//! ``src/api/backend.rs``
//! ============================================================================
//! # `MovieBackend`: the REST collaborator seen from the client
//!
//! State containers only talk to this trait. The production implementation is
//! [`crate::api::http::HttpBackend`]; tests substitute an in-memory fake.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiError;
use crate::model::movie::{Movie, MovieDraft, MovieId, MoviePatch};
use crate::model::query::MovieQuery;

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /sessions`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

/// One page of a listing plus the collection-wide count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: u64,
}

/// What the backend reports after a file import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReceipt {
    pub movies: Vec<Movie>,
    pub imported: u64,
    pub total: u64,
}

/// The raw file handed to `POST /movies/import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait MovieBackend: Send + Sync + Debug {
    /// `POST /users`; yields the session token.
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String>;

    /// `POST /sessions`; yields the session token.
    async fn login(&self, request: &LoginRequest) -> ApiResult<String>;

    /// `GET /movies`
    async fn list_movies(&self, query: &MovieQuery) -> ApiResult<MoviePage>;

    /// `GET /movies/:id`
    async fn get_movie(&self, id: &MovieId) -> ApiResult<Movie>;

    /// `POST /movies`
    async fn create_movie(&self, draft: &MovieDraft) -> ApiResult<Movie>;

    /// `PATCH /movies/:id`
    async fn update_movie(&self, id: &MovieId, patch: &MoviePatch) -> ApiResult<Movie>;

    /// `DELETE /movies/:id`
    async fn delete_movie(&self, id: &MovieId) -> ApiResult<()>;

    /// `POST /movies/import` (multipart, field `movies`)
    async fn import_movies(&self, upload: &ImportUpload) -> ApiResult<ImportReceipt>;
}
