//! src/logging.rs
//! ============================================================================
//! # Logger: file-backed tracing for a full-screen terminal client
//!
//! The terminal belongs to ratatui while the app runs, so every event goes to
//! a rolling file through the non-blocking writer. `RUST_LOG` takes
//! precedence over the configured level. Keep the returned [`WorkerGuard`]
//! alive until shutdown or buffered lines are lost.

use std::path::PathBuf;

use anyhow::{Context, Result};
use compact_str::CompactString;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    #[default]
    Daily,
}

impl From<LogRotation> for Rotation {
    fn from(value: LogRotation) -> Self {
        match value {
            LogRotation::Never => Self::NEVER,
            LogRotation::Daily => Self::DAILY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub log_file_prefix: CompactString,
    pub log_level: CompactString,
    pub max_log_files: usize,
    pub rotation: LogRotation,
    /// One JSON object per line instead of plain text.
    pub json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_file_prefix: CompactString::const_new("shelf"),
            log_level: CompactString::const_new("info"),
            max_log_files: 10,
            rotation: LogRotation::Daily,
            json: false,
        }
    }
}

fn default_log_dir() -> PathBuf {
    ProjectDirs::from("org", "shelf", "Shelf")
        .map_or_else(|| PathBuf::from("./logs"), |d| d.data_local_dir().join("logs"))
}

impl LoggerConfig {
    /// `RUST_LOG` if set and valid, otherwise the configured level.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(self.log_level.as_str())
            .with_context(|| format!("Invalid log level in config: {}", self.log_level))
    }
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. Fails if one is already installed.
    pub fn init_tracing(config: &LoggerConfig) -> Result<WorkerGuard> {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory {}", config.log_dir.display())
        })?;

        let suffix = if config.json { "jsonl" } else { "log" };
        let appender = RollingFileAppender::builder()
            .rotation(config.rotation.into())
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix(suffix)
            .max_log_files(config.max_log_files)
            .build(&config.log_dir)
            .context("Failed to create file appender")?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let fmt_layer = if config.json {
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(config.env_filter()?)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        tracing::info!(dir = %config.log_dir.display(), "logging initialised");
        Ok(guard)
    }
}
