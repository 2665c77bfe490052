//! Competency framework structure: sections (domains) of topic rows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level::{LevelOption, PLACEHOLDER_DESCRIPTION, ProficiencyLevel};

/// One row of the framework table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRow {
    /// Value of the `Domains and Topics` column.
    pub topic: String,
    /// Source descriptions per assessed level. Empty cells are absent.
    pub descriptions: BTreeMap<ProficiencyLevel, String>,
}

impl TopicRow {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            descriptions: BTreeMap::new(),
        }
    }

    /// Builder-style helper used by loaders and tests.
    #[must_use]
    pub fn with_description(mut self, level: ProficiencyLevel, text: impl Into<String>) -> Self {
        self.descriptions.insert(level, text.into());
        self
    }

    /// Source description for a level, if the table provided one.
    pub fn description(&self, level: ProficiencyLevel) -> Option<&str> {
        self.descriptions.get(&level).map(String::as_str)
    }

    /// The option rendered for `level`.
    ///
    /// Fixed descriptions win over source text; missing source text falls
    /// back to [`PLACEHOLDER_DESCRIPTION`].
    pub fn option(&self, level: ProficiencyLevel) -> LevelOption {
        let description = level
            .fixed_description()
            .or_else(|| self.description(level))
            .unwrap_or(PLACEHOLDER_DESCRIPTION);
        LevelOption {
            level,
            description: description.to_string(),
        }
    }

    /// All options for this topic in rendering order.
    pub fn level_options(&self) -> Vec<LevelOption> {
        ProficiencyLevel::ALL
            .iter()
            .map(|level| self.option(*level))
            .collect()
    }
}

/// A numbered domain header and the topics listed beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Full header text, e.g. `"1. Laboratory methods"`.
    pub header: String,
    pub rows: Vec<TopicRow>,
}

impl Section {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            rows: Vec::new(),
        }
    }

    /// Leading integer of the header (`"3. Foo"` gives `Some(3)`).
    pub fn number(&self) -> Option<u32> {
        let digits: String = self
            .header
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    /// Returns true if the header has no topics beneath it.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Position of a topic within the framework.
///
/// Ordering is section-major, so sorting keys yields rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicKey {
    pub section: usize,
    pub row: usize,
}

impl TopicKey {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {}, row {}", self.section, self.row)
    }
}

/// The parsed competency framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    pub sections: Vec<Section>,
}

impl Framework {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Section headers in framework order.
    pub fn headers(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.iter().map(|section| section.header.as_str())
    }

    /// Indices of every section whose header is exactly `header`.
    ///
    /// Headers are not unique; a repeated header names all of its sections.
    pub fn sections_with_header(&self, header: &str) -> Vec<usize> {
        self.indices_where(|section| section.header == header)
    }

    /// Resolves a user-supplied domain reference to section indices.
    ///
    /// Accepts the exact header text or the header's leading number
    /// (`"2"` resolves `"2. Bioinformatics"`). Empty if nothing matches.
    pub fn resolve_domain(&self, reference: &str) -> Vec<usize> {
        let exact = self.sections_with_header(reference);
        if !exact.is_empty() {
            return exact;
        }
        match reference.trim().trim_end_matches('.').parse::<u32>() {
            Ok(number) => self.indices_where(|section| section.number() == Some(number)),
            Err(_) => Vec::new(),
        }
    }

    fn indices_where(&self, predicate: impl Fn(&Section) -> bool) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, section)| predicate(section))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn topic(&self, key: TopicKey) -> Option<&TopicRow> {
        self.sections.get(key.section)?.rows.get(key.row)
    }

    /// Total number of topic rows across every section.
    pub fn topic_count(&self) -> usize {
        self.sections.iter().map(|section| section.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
