//! ``src/import/catalog.rs``
//! Reading a catalog file from disk for preview and upload.

use std::path::{Path, PathBuf};

use tokio::fs as TokioFs;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::import::parser::{ParseOutcome, parse_catalog};

/// Extension accepted by the import picker.
pub const CATALOG_EXTENSION: &str = "txt";

/// A catalog read from disk together with its local parse.
#[derive(Debug, Clone)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub outcome: ParseOutcome,
}

impl CatalogFile {
    /// Read and parse `path`. Only `.txt` files are accepted.
    #[instrument(level = "debug", fields(path = %path.display()))]
    pub async fn read(path: &Path, current_year: i32) -> Result<Self, AppError> {
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CATALOG_EXTENSION));
        if !is_txt {
            return Err(AppError::invalid_input("file", "Please select a .txt file"));
        }

        if !TokioFs::try_exists(path).await? {
            return Err(AppError::NotFound(path.to_path_buf()));
        }

        let bytes = TokioFs::read(path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let outcome = parse_catalog(&text, current_year);
        debug!(
            blocks = outcome.blocks,
            movies = outcome.movies.len(),
            errors = outcome.errors.len(),
            "catalog parsed"
        );

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "movies.txt".to_owned());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            bytes,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_non_txt_paths() {
        let err = CatalogFile::read(Path::new("movies.csv"), 2026).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn reads_and_parses_txt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.TXT");
        tokio::fs::write(&path, "Title: A\nRelease Year: 2000\nFormat: DVD\n")
            .await
            .unwrap();

        let file = CatalogFile::read(&path, 2026).await.unwrap();
        assert_eq!(file.file_name, "catalog.TXT");
        assert_eq!(file.outcome.movies.len(), 1);
        assert!(!file.bytes.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogFile::read(&dir.path().join("nope.txt"), 2026)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
