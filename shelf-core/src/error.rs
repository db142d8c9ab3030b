//! src/error.rs
//! ============================================================================
//! # Error types for the movie shelf client
//!
//! Two layers live here. [`ApiError`] is the tagged result type produced at the
//! backend boundary, so nothing downstream branches on raw status numbers.
//! [`OpError`] is what every state-container operation records into its own
//! error slot. [`AppError`] is the application-level error used by bootstrap
//! code (config, terminal, IO).

use std::{fmt, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the movie/auth backend collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, timeout, broken body stream.
    #[error("Network error: {0}")]
    Transport(String),

    /// HTTP 401 from any endpoint. The session is no longer valid.
    #[error("Session expired")]
    Unauthorized,

    /// The backend understood the request and refused it.
    #[error("{code}")]
    Rejected { status: Option<u16>, code: String },

    /// The body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn rejected<S: Into<String>>(status: Option<u16>, code: S) -> Self {
        Self::Rejected {
            status,
            code: code.into(),
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Coarse classification shown to the user next to an operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Rejected client-side, never sent.
    Validation,
    /// Transport failure; retrying may help.
    Network,
    /// Backend-supplied rejection or malformed response.
    Server,
    /// Authorization expired; handled by a global logout.
    SessionExpired,
    /// Issued before the container was reset; the outcome is dropped.
    Superseded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Server => "server",
            Self::SessionExpired => "session expired",
            Self::Superseded => "superseded",
        };
        write!(f, "{s}")
    }
}

/// Error recorded into an operation's own slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OpError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OpError {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// One error carrying every client-side validation message, joined.
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = messages
            .into_iter()
            .map(|m| m.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(ErrorKind::Validation, joined)
    }

    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Network)
    }

    pub const fn is_session_expired(&self) -> bool {
        matches!(self.kind, ErrorKind::SessionExpired)
    }

    /// Outcome of a request from before a logout or session expiry.
    pub fn superseded() -> Self {
        Self::new(ErrorKind::Superseded, "Request belongs to an earlier session")
    }

    pub const fn is_superseded(&self) -> bool {
        matches!(self.kind, ErrorKind::Superseded)
    }
}

impl From<ApiError> for OpError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Transport(msg) => Self::new(ErrorKind::Network, msg),
            ApiError::Unauthorized => Self::new(ErrorKind::SessionExpired, "Session expired"),
            ApiError::Rejected { code, .. } => Self::new(ErrorKind::Server, code),
            ApiError::Decode(msg) => Self::new(ErrorKind::Server, msg),
        }
    }
}

/// Unified error type for application bootstrap and IO.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Requested file does not exist.
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (e.g., JSON).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    #[must_use]
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
