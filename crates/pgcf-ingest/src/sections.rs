//! Splitting the flat framework table into numbered sections.
//!
//! A row whose topic starts with an integer, a period and whitespace
//! (`"3. Data analysis"`) opens a new section. Every other row belongs to
//! the most recent section. Rows seen before the first header have no
//! section and are dropped.

use std::sync::LazyLock;

use pgcf_model::{Framework, Section, TopicRow};
use regex::Regex;
use tracing::debug;

static SECTION_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("Invalid section header regex"));

/// Returns true if `text` is a section header such as `"1. Domain A"`.
pub fn is_section_header(text: &str) -> bool {
    SECTION_HEADER_REGEX.is_match(text)
}

/// Groups rows under their section headers, preserving source order.
///
/// Sections without topic rows are kept.
pub fn parse_sections<I>(rows: I) -> Framework
where
    I: IntoIterator<Item = TopicRow>,
{
    let mut sections: Vec<Section> = Vec::new();
    let mut orphaned = 0usize;

    for row in rows {
        if is_section_header(&row.topic) {
            sections.push(Section::new(row.topic));
            continue;
        }
        match sections.last_mut() {
            Some(current) => current.rows.push(row),
            None => orphaned += 1,
        }
    }

    if orphaned > 0 {
        debug!(orphaned, "rows before the first section header were dropped");
    }
    Framework::new(sections)
}
