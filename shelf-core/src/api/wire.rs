//! ``src/api/wire.rs``
//! ============================================================================
//! # JSON shapes exchanged with the backend
//!
//! Envelopes carry a numeric `status` where `1` means success. Movies come
//! back with numeric ids, actors either as plain names or as records, and
//! occasionally a stringly-typed year; [`ApiMovie::into_movie`] normalizes all
//! of that into a [`Movie`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::movie::{Movie, MovieFormat};

/// Envelope status signalling success.
pub const STATUS_OK: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiActor {
    Name(String),
    Record { name: String },
}

impl ApiActor {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Record { name } => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMovie {
    pub id: Value,
    pub title: String,
    pub year: Value,
    pub format: String,
    #[serde(default)]
    pub actors: Vec<ApiActor>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiMovie {
    pub fn into_movie(self) -> Result<Movie, ApiError> {
        let id = match &self.id {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(ApiError::Decode(format!("movie id {other}"))),
        };

        let year = match &self.year {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ApiError::Decode(format!("movie {id} year {}", self.year)))?;

        let format = MovieFormat::parse_loose(&self.format)
            .ok_or_else(|| ApiError::Decode(format!("movie {id} format {:?}", self.format)))?;

        Ok(Movie {
            id,
            title: self.title,
            year,
            format,
            actors: self.actors.into_iter().map(ApiActor::into_name).collect(),
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
        })
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope {
    pub status: i64,
    #[serde(default)]
    pub data: Vec<ApiMovie>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieEnvelope {
    pub status: i64,
    pub data: Option<ApiMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportMeta {
    pub imported: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportEnvelope {
    pub status: i64,
    #[serde(default)]
    pub data: Vec<ApiMovie>,
    pub meta: Option<ImportMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthEnvelope {
    pub status: i64,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
}

/// Error body; only `error.code` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

/// Backend error code inside an error body, if any.
pub fn error_code(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.code)
}

/// Convert a batch of wire movies, failing on the first malformed one.
pub fn convert_all(movies: Vec<ApiMovie>) -> Result<Vec<Movie>, ApiError> {
    movies.into_iter().map(ApiMovie::into_movie).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_numeric_ids_and_actor_records() {
        let json = r#"{
            "id": 12, "title": "Casablanca", "year": "1942", "format": "DVD",
            "actors": [{"id": 1, "name": "Humphrey Bogart", "createdAt": "", "updatedAt": ""}, "Ingrid Bergman"],
            "createdAt": "2024-05-01T10:00:00.000Z", "updatedAt": "garbage"
        }"#;
        let movie = serde_json::from_str::<ApiMovie>(json).unwrap().into_movie().unwrap();
        assert_eq!(movie.id, "12");
        assert_eq!(movie.year, 1942);
        assert_eq!(movie.format, MovieFormat::Dvd);
        assert_eq!(movie.actors, vec!["Humphrey Bogart", "Ingrid Bergman"]);
        assert!(movie.created_at.is_some());
        assert!(movie.updated_at.is_none());
    }

    #[test]
    fn unknown_format_is_a_decode_error() {
        let json = r#"{"id": 1, "title": "T", "year": 2000, "format": "Betamax"}"#;
        let err = serde_json::from_str::<ApiMovie>(json).unwrap().into_movie().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn list_envelope_without_meta() {
        let env: ListEnvelope = serde_json::from_str(r#"{"status": 1, "data": []}"#).unwrap();
        assert_eq!(env.status, STATUS_OK);
        assert!(env.meta.is_none());
    }

    #[test]
    fn extracts_error_code() {
        let body = br#"{"status":0,"error":{"fields":{"email":"NOT_UNIQUE"},"code":"EMAIL_NOT_UNIQUE"}}"#;
        assert_eq!(error_code(body).as_deref(), Some("EMAIL_NOT_UNIQUE"));
        assert_eq!(error_code(b"<html>"), None);
    }
}
