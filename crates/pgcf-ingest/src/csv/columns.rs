//! Header resolution for the framework table.

use std::path::Path;

use csv::StringRecord;
use pgcf_model::ProficiencyLevel;

use crate::error::{IngestError, Result};

/// Column holding section headers and topic names.
pub const TOPIC_COLUMN: &str = "Domains and Topics";

/// Positions of the columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkColumns {
    pub topic: usize,
    /// One entry per assessed level, in level order.
    pub levels: Vec<(ProficiencyLevel, usize)>,
}

impl FrameworkColumns {
    /// Locates the required columns in a header row.
    ///
    /// Extra columns are ignored. The first missing column is reported.
    pub fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| {
            normalized
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| IngestError::MissingColumn {
                    column: name.to_string(),
                    path: path.to_path_buf(),
                })
        };

        let topic = find(TOPIC_COLUMN)?;
        let mut levels = Vec::with_capacity(ProficiencyLevel::ASSESSED.len());
        for level in ProficiencyLevel::ASSESSED {
            levels.push((level, find(level.as_str())?));
        }
        Ok(Self { topic, levels })
    }
}

/// Trims, drops a UTF-8 BOM and collapses inner whitespace runs.
pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
