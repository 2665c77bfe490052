//! Export document rendering and parsing.
//!
//! Layout:
//!
//! ```text
//! # Name / ID: JS-001
//! # Job Title:
//! # Role:
//! Competency,Selected Level,Description
//! Sequencing QC,Understand,Can interpret QC metrics
//! ```
//!
//! The three metadata lines are always present. The remainder is a standard
//! CSV table quoted only where necessary.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use pgcf_model::{ProficiencyLevel, Respondent, ResultRow};
use tracing::info;

use crate::error::{OutputError, Result};

/// Fixed file (and object) name of the export.
pub const EXPORT_FILE_NAME: &str = "competency_selections.csv";

/// MIME type of the export.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Header row of the export table.
pub const EXPORT_COLUMNS: [&str; 3] = ["Competency", "Selected Level", "Description"];

const IDENTITY_LABEL: &str = "# Name / ID:";
const JOB_TITLE_LABEL: &str = "# Job Title:";
const ROLE_LABEL: &str = "# Role:";

/// A parsed export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExport {
    pub respondent: Respondent,
    pub rows: Vec<ResultRow>,
}

/// The three metadata lines, without terminators.
///
/// Line breaks inside values are replaced by spaces so the header stays
/// exactly three lines long.
pub fn metadata_lines(respondent: &Respondent) -> [String; 3] {
    [
        format!("{IDENTITY_LABEL} {}", single_line(&respondent.identity)),
        format!("{JOB_TITLE_LABEL} {}", single_line(&respondent.job_title)),
        format!("{ROLE_LABEL} {}", single_line(&respondent.role)),
    ]
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Renders the export document as UTF-8 bytes.
pub fn render_export(respondent: &Respondent, rows: &[ResultRow]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for line in metadata_lines(respondent) {
        buffer.extend_from_slice(line.as_bytes());
        buffer.push(b'\n');
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.competency.as_str(),
            row.level.as_str(),
            row.description.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| OutputError::Io {
        operation: "flush",
        path: EXPORT_FILE_NAME.into(),
        source: e.into_error(),
    })
}

/// Parses an export document produced by [`render_export`].
pub fn read_export(bytes: &[u8]) -> Result<ParsedExport> {
    let text = std::str::from_utf8(bytes).map_err(|e| OutputError::InvalidExport {
        reason: format!("not UTF-8: {e}"),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rest = text;
    let mut values = Vec::with_capacity(3);
    for label in [IDENTITY_LABEL, JOB_TITLE_LABEL, ROLE_LABEL] {
        let (line, remainder) = rest.split_once('\n').ok_or_else(|| missing_line(label))?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let value = line.strip_prefix(label).ok_or_else(|| missing_line(label))?;
        values.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        rest = remainder;
    }
    let [identity, job_title, role]: [String; 3] =
        values.try_into().map_err(|_| missing_line(ROLE_LABEL))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(rest.as_bytes());
    let headers = reader.headers()?.clone();
    if headers.iter().ne(EXPORT_COLUMNS) {
        return Err(OutputError::InvalidExport {
            reason: format!("unexpected header row: {}", headers.iter().collect::<Vec<_>>().join(",")),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |index: usize| record.get(index).unwrap_or("").to_string();
        let level: ProficiencyLevel =
            field(1)
                .parse()
                .map_err(|e: pgcf_model::ModelError| OutputError::InvalidExport {
                    reason: e.to_string(),
                })?;
        rows.push(ResultRow {
            competency: field(0),
            level,
            description: field(2),
        });
    }

    Ok(ParsedExport {
        respondent: Respondent {
            identity,
            job_title,
            role,
        },
        rows,
    })
}

fn missing_line(label: &str) -> OutputError {
    OutputError::InvalidExport {
        reason: format!("missing metadata line '{label}'"),
    }
}

/// Writes export bytes to `path` via a temp file and rename.
pub fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("csv.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| OutputError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| OutputError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| OutputError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(competency: &str, level: ProficiencyLevel, description: &str) -> ResultRow {
        ResultRow {
            competency: competency.to_string(),
            level,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_single_topic_scenario() {
        let respondent = Respondent::new("JS-001", "", "");
        let rows = vec![row(
            "Sequencing QC",
            ProficiencyLevel::Understand,
            "Can interpret QC metrics",
        )];
        let bytes = render_export(&respondent, &rows).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "# Name / ID: JS-001\n\
             # Job Title: \n\
             # Role: \n\
             Competency,Selected Level,Description\n\
             Sequencing QC,Understand,Can interpret QC metrics\n"
        );
    }

    #[test]
    fn test_empty_selection_has_header_only() {
        let bytes = render_export(&Respondent::default(), &[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "# Name / ID: \n# Job Title: \n# Role: \nCompetency,Selected Level,Description\n"
        );
    }

    #[test]
    fn test_metadata_stays_on_one_line() {
        let respondent = Respondent::new("A\nB", "x\r\ny", "");
        let lines = metadata_lines(&respondent);
        assert_eq!(lines[0], "# Name / ID: A B");
        assert_eq!(lines[1], "# Job Title: x  y");
    }

    #[test]
    fn test_read_export_round_trip() {
        let respondent = Respondent::new("JS-001", "Biomedical Scientist", "QC, training");
        let rows = vec![
            row("Typing, serotyping", ProficiencyLevel::Apply, "Uses \"MLST\""),
            row("Assembly", ProficiencyLevel::NotApplicable, "Not applicable"),
        ];
        let bytes = render_export(&respondent, &rows).unwrap();
        let parsed = read_export(&bytes).unwrap();

        assert_eq!(parsed.respondent, respondent);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn test_read_export_rejects_missing_metadata() {
        let result = read_export(b"Competency,Selected Level,Description\n");
        assert!(matches!(result, Err(OutputError::InvalidExport { .. })));
    }

    #[test]
    fn test_read_export_rejects_unknown_level() {
        let bytes = b"# Name / ID: \n# Job Title: \n# Role: \n\
                      Competency,Selected Level,Description\nX,Expert,desc\n";
        let result = read_export(bytes);
        assert!(matches!(result, Err(OutputError::InvalidExport { .. })));
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join(EXPORT_FILE_NAME);
        write_export(&path, b"data").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(!path.with_extension("csv.tmp").exists());
    }
}
