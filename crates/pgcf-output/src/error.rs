//! Error types for export rendering, writing and uploading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering, writing or reading an export.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temp file could not be moved into place.
    #[error("failed to move {temp_path} to {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes do not follow the export layout.
    #[error("invalid export: {reason}")]
    InvalidExport { reason: String },
}

/// Errors raised by an [`ObjectSink`](crate::ObjectSink).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    /// A required setting is missing or empty.
    #[error("upload is not configured: missing {field}")]
    NotConfigured { field: &'static str },

    /// Request could not be sent or the response could not be read.
    #[error("network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// The configured endpoint does not form a valid URL.
    #[error("invalid storage endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The service account key cannot be used.
    #[error("invalid service account key: {reason}")]
    InvalidCredentials { reason: String },

    /// The token endpoint refused the service account assertion.
    #[error("access token request failed (HTTP {status}): {message}")]
    TokenRejected { status: u16, message: String },

    /// The object store answered with a non-success status.
    #[error("object store rejected upload (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Local sink I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// Short message suitable for showing to the respondent.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotConfigured { .. } => "Upload is not configured for this deployment.",
            Self::InvalidEndpoint { .. } => "The storage endpoint setting is not a valid URL.",
            Self::InvalidCredentials { .. } => "The storage credentials are not usable.",
            Self::TokenRejected { .. } => "The storage service did not accept the credentials.",
            Self::Network { .. } => "Could not reach the storage service.",
            Self::Rejected { .. } => "The storage service rejected the upload.",
            Self::Io { .. } => "Could not write the upload to its destination.",
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, OutputError>;
