//! Framework table reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use pgcf_model::TopicRow;
use tracing::debug;

use super::columns::FrameworkColumns;
use crate::error::{IngestError, Result};

/// Rows of the framework table in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameworkTable {
    pub rows: Vec<TopicRow>,
    /// Rows skipped because `Domains and Topics` was empty.
    pub dropped: usize,
}

/// Reads the framework table from a CSV file.
pub fn read_framework_table(path: &Path) -> Result<FrameworkTable> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    read_framework_table_from_reader(file, path)
}

/// Reads the framework table from any reader; `path` is used for error context.
///
/// Rows whose `Domains and Topics` cell is blank are skipped. Kept cells
/// retain their text as written, so a topic with leading whitespace is never
/// mistaken for a section header. Blank level cells are absent descriptions.
pub fn read_framework_table_from_reader<R: Read>(reader: R, path: &Path) -> Result<FrameworkTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let columns = FrameworkColumns::resolve(&headers, path)?;

    let mut table = FrameworkTable::default();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        let topic = record.get(columns.topic).unwrap_or("");
        if topic.trim().is_empty() {
            table.dropped += 1;
            continue;
        }
        let mut row = TopicRow::new(topic);
        for &(level, index) in &columns.levels {
            let cell = record.get(index).unwrap_or("");
            if !cell.trim().is_empty() {
                row = row.with_description(level, cell);
            }
        }
        table.rows.push(row);
    }

    debug!(
        path = %path.display(),
        rows = table.rows.len(),
        dropped = table.dropped,
        "framework table read"
    );
    Ok(table)
}
