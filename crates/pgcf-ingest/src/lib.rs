//! Competency framework ingestion.
//!
//! This crate turns the framework CSV into a [`Framework`](pgcf_model::Framework):
//!
//! - **CSV Loading**: read the `Domains and Topics` column and one column per
//!   proficiency level, skipping rows without a topic
//! - **Section Parsing**: group rows under numbered domain headers
//! - **Caching**: load the framework once per process
//!
//! # Example
//!
//! ```ignore
//! use pgcf_ingest::FrameworkCache;
//!
//! let cache = FrameworkCache::new("PGCF.csv");
//! let framework = cache.get()?;
//! for header in framework.headers() {
//!     println!("{header}");
//! }
//! ```

mod cache;
mod csv;
mod error;
mod sections;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    FrameworkColumns, FrameworkTable, TOPIC_COLUMN, read_framework_table,
    read_framework_table_from_reader,
};

// === Section Parsing ===
pub use sections::{is_section_header, parse_sections};

// === Framework Loading ===
pub use cache::{FrameworkCache, load_framework};
