//! Error types for framework ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the competency framework.
///
/// All of them are fatal: the application cannot render a partial framework.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Framework file not found.
    #[error("framework file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the framework file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// Required column not found in the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

impl IngestError {
    /// Maps an I/O error on `path` to the matching variant.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
