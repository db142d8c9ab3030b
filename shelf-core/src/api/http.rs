//! ``src/api/http.rs``
//! ============================================================================
//! # `HttpBackend`: reqwest implementation of [`MovieBackend`]
//!
//! Every movie request carries the session token verbatim in the
//! `Authorization` header. Responses are classified into [`ApiError`] here so
//! the state containers never look at HTTP status codes or envelope numbers.
//! The auth endpoints are public: a 401 from them is an ordinary rejection,
//! not a session expiry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::api::backend::{
    ApiResult, ImportReceipt, ImportUpload, LoginRequest, MovieBackend, MoviePage,
    RegisterRequest,
};
use crate::api::wire::{
    AuthEnvelope, ImportEnvelope, ListEnvelope, MovieEnvelope, STATUS_OK, convert_all, error_code,
};
use crate::error::ApiError;
use crate::model::movie::{Movie, MovieDraft, MovieId, MoviePatch};
use crate::model::query::MovieQuery;
use crate::model::session::Session;

/// Header some deployments use for the collection size.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<RawResponse> {
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Authorized call; 401 becomes [`ApiError::Unauthorized`].
    async fn send(&self, request: RequestBuilder) -> ApiResult<RawResponse> {
        let raw = self.execute(self.authorized(request)).await?;
        check_status(raw.status, &raw.body)?;
        Ok(raw)
    }

    /// Public call (auth endpoints); 401 is a plain rejection.
    async fn send_public(&self, request: RequestBuilder) -> ApiResult<RawResponse> {
        let raw = self.execute(request).await?;
        match check_status(raw.status, &raw.body) {
            Err(ApiError::Unauthorized) => Err(ApiError::rejected(
                Some(StatusCode::UNAUTHORIZED.as_u16()),
                error_code(&raw.body).unwrap_or_else(|| "UNAUTHORIZED".to_owned()),
            )),
            other => other.map(|()| raw),
        }
    }

    async fn token_call<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<String> {
        let raw = self
            .send_public(self.client.post(self.url(path)).json(body))
            .await?;
        let envelope: AuthEnvelope = decode(&raw.body)?;
        ensure_ok(envelope.status, &raw.body, fallback)?;
        envelope
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Decode("missing token".to_owned()))
    }

    fn single_movie(raw: &RawResponse, fallback: &str) -> ApiResult<Movie> {
        let envelope: MovieEnvelope = decode(&raw.body)?;
        ensure_ok(envelope.status, &raw.body, fallback)?;
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("missing movie data".to_owned()))?
            .into_movie()
    }
}

/// Map an HTTP status to the boundary error type.
pub fn check_status(status: StatusCode, body: &[u8]) -> ApiResult<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let code = error_code(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
        });
        return Err(ApiError::rejected(Some(status.as_u16()), code));
    }
    Ok(())
}

/// A 2xx response whose envelope status is not `1` is still a rejection.
pub fn ensure_ok(status: i64, body: &[u8], fallback: &str) -> ApiResult<()> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(ApiError::rejected(
            None,
            error_code(body).unwrap_or_else(|| fallback.to_owned()),
        ))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `meta.total`, else the `X-Total-Count` header, else the page length.
pub fn resolve_total(meta_total: Option<u64>, headers: &HeaderMap, page_len: usize) -> u64 {
    meta_total
        .or_else(|| {
            headers
                .get(TOTAL_COUNT_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(page_len as u64)
}

#[async_trait]
impl MovieBackend for HttpBackend {
    #[instrument(level = "info", skip_all, fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String> {
        self.token_call("users", request, "Registration failed").await
    }

    #[instrument(level = "info", skip_all, fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> ApiResult<String> {
        self.token_call("sessions", request, "Login failed").await
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_movies(&self, query: &MovieQuery) -> ApiResult<MoviePage> {
        let request = self.client.get(self.url("movies")).query(&query.to_params());
        let raw = self.send(request).await?;
        let envelope: ListEnvelope = decode(&raw.body)?;
        ensure_ok(envelope.status, &raw.body, "Failed to fetch movies")?;

        let page_len = envelope.data.len();
        let total = resolve_total(
            envelope.meta.and_then(|m| m.total),
            &raw.headers,
            page_len,
        );
        Ok(MoviePage {
            movies: convert_all(envelope.data)?,
            total,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_movie(&self, id: &MovieId) -> ApiResult<Movie> {
        let raw = self
            .send(self.client.get(self.url(&format!("movies/{id}"))))
            .await?;
        Self::single_movie(&raw, "Failed to fetch movie")
    }

    #[instrument(level = "info", skip_all, fields(title = %draft.title))]
    async fn create_movie(&self, draft: &MovieDraft) -> ApiResult<Movie> {
        let raw = self
            .send(self.client.post(self.url("movies")).json(draft))
            .await?;
        Self::single_movie(&raw, "Failed to create movie")
    }

    #[instrument(level = "info", skip(self, patch))]
    async fn update_movie(&self, id: &MovieId, patch: &MoviePatch) -> ApiResult<Movie> {
        let raw = self
            .send(self.client.patch(self.url(&format!("movies/{id}"))).json(patch))
            .await?;
        Self::single_movie(&raw, "Failed to update movie")
    }

    #[instrument(level = "info", skip(self))]
    async fn delete_movie(&self, id: &MovieId) -> ApiResult<()> {
        let raw = self
            .send(self.client.delete(self.url(&format!("movies/{id}"))))
            .await?;
        if raw.status == StatusCode::OK {
            Ok(())
        } else {
            warn!(status = raw.status.as_u16(), "unexpected delete status");
            Err(ApiError::rejected(
                Some(raw.status.as_u16()),
                "Failed to delete movie",
            ))
        }
    }

    #[instrument(level = "info", skip_all, fields(file = %upload.file_name, bytes = upload.bytes.len()))]
    async fn import_movies(&self, upload: &ImportUpload) -> ApiResult<ImportReceipt> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str("text/plain")?;
        let form = Form::new().part("movies", part);

        let raw = self
            .send(self.client.post(self.url("movies/import")).multipart(form))
            .await?;
        let envelope: ImportEnvelope = decode(&raw.body)?;
        ensure_ok(envelope.status, &raw.body, "Failed to import movies")?;

        let movies = convert_all(envelope.data)?;
        let (imported, total) = envelope
            .meta
            .map_or((movies.len() as u64, movies.len() as u64), |m| (m.imported, m.total));
        Ok(ImportReceipt {
            movies,
            imported,
            total,
        })
    }
}
