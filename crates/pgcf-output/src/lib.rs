//! Assessment export for the PGCF self-assessment.
//!
//! Renders a respondent's selections as a CSV document with three leading
//! `# ` metadata lines, writes it locally and optionally uploads it to an
//! object store.

pub mod auth;
pub mod error;
pub mod export;
pub mod upload;

pub use auth::{DEFAULT_TOKEN_URI, GcsCredential, STORAGE_SCOPE, ServiceAccountKey};
pub use error::{OutputError, Result, UploadError};
pub use export::{
    EXPORT_COLUMNS, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, ParsedExport, metadata_lines,
    read_export, render_export, write_export,
};
pub use upload::{
    DirectorySink, GCS_DEFAULT_ENDPOINT, GcsSink, ObjectSink, UploadReceipt, upload_export,
};
