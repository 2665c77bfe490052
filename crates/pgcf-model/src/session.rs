//! A single respondent's assessment session.
//!
//! The session borrows the shared, read-only [`Framework`] and owns all
//! per-respondent state: the respondent details, the chosen domains and the
//! recorded selections. It is created when an interaction starts and dropped
//! when it ends; nothing outlives it except an explicit export.
//!
//! Selections for topics whose domain is later deselected are retained but
//! hidden: they are excluded from [`AssessmentSession::results`] and come
//! back if the domain is chosen again.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SessionError;
use crate::framework::{Framework, Section, TopicKey, TopicRow};
use crate::level::{LevelOption, ProficiencyLevel};
use crate::respondent::Respondent;
use crate::selection::{Selection, SelectionSet};

/// A topic as presented to the respondent.
#[derive(Debug, Clone)]
pub struct RenderedTopic<'a> {
    pub key: TopicKey,
    pub section_header: &'a str,
    pub row: &'a TopicRow,
    /// Choices in rendering order.
    pub options: Vec<LevelOption>,
}

impl RenderedTopic<'_> {
    pub fn topic(&self) -> &str {
        &self.row.topic
    }
}

/// One exported answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub competency: String,
    pub level: ProficiencyLevel,
    pub description: String,
}

/// Per-respondent assessment state.
#[derive(Debug)]
pub struct AssessmentSession<'a> {
    framework: &'a Framework,
    respondent: Respondent,
    /// Chosen section indices, sorted and unique.
    domains: Vec<usize>,
    selections: SelectionSet,
}

impl<'a> AssessmentSession<'a> {
    pub fn new(framework: &'a Framework) -> Self {
        Self {
            framework,
            respondent: Respondent::default(),
            domains: Vec::new(),
            selections: SelectionSet::new(),
        }
    }

    pub fn framework(&self) -> &'a Framework {
        self.framework
    }

    pub fn set_respondent(&mut self, respondent: Respondent) {
        self.respondent = respondent;
    }

    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    /// Replaces the set of domains to assess, by header text.
    ///
    /// Every section carrying a given header is chosen, so a repeated header
    /// selects all of its sections. On error the previous choice is left
    /// untouched. Chosen domains are kept in framework order regardless of
    /// the order given.
    pub fn choose_domains<I, S>(&mut self, headers: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domains = Vec::new();
        for header in headers {
            let header = header.as_ref();
            let indices = self.framework.sections_with_header(header);
            if indices.is_empty() {
                return Err(SessionError::UnknownDomain {
                    header: header.to_string(),
                });
            }
            domains.extend(indices);
        }
        self.set_domains(domains);
        Ok(())
    }

    /// Replaces the set of domains to assess, by section index.
    ///
    /// Use this when the respondent picked a specific section, e.g. from a
    /// numbered list where headers may repeat.
    pub fn choose_sections<I>(&mut self, indices: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut domains = Vec::new();
        for index in indices {
            if self.framework.section(index).is_none() {
                return Err(SessionError::UnknownSection { index });
            }
            domains.push(index);
        }
        self.set_domains(domains);
        Ok(())
    }

    fn set_domains(&mut self, mut domains: Vec<usize>) {
        domains.sort_unstable();
        domains.dedup();
        self.domains = domains;

        let hidden = self.hidden_selection_count();
        debug!(
            domain_count = self.domains.len(),
            hidden_selections = hidden,
            "domains chosen"
        );
    }

    pub fn has_domains(&self) -> bool {
        !self.domains.is_empty()
    }

    /// Chosen sections with their indices, in framework order.
    pub fn chosen_sections(&self) -> Vec<(usize, &'a Section)> {
        let framework = self.framework;
        self.domains
            .iter()
            .filter_map(|&index| framework.section(index).map(|section| (index, section)))
            .collect()
    }

    /// Every topic of the chosen domains, in rendering order.
    pub fn rendered_topics(&self) -> Vec<RenderedTopic<'a>> {
        let framework = self.framework;
        let mut topics = Vec::new();
        for &section_index in &self.domains {
            let Some(section) = framework.section(section_index) else {
                continue;
            };
            for (row_index, row) in section.rows.iter().enumerate() {
                topics.push(RenderedTopic {
                    key: TopicKey::new(section_index, row_index),
                    section_header: section.header.as_str(),
                    row,
                    options: row.level_options(),
                });
            }
        }
        topics
    }

    /// Returns true if the topic belongs to a chosen domain.
    pub fn is_rendered(&self, key: TopicKey) -> bool {
        self.domains.binary_search(&key.section).is_ok() && self.framework.topic(key).is_some()
    }

    /// Records the respondent's choice for a rendered topic.
    ///
    /// The stored description is the one the option was rendered with.
    pub fn select(
        &mut self,
        key: TopicKey,
        level: ProficiencyLevel,
    ) -> Result<&Selection, SessionError> {
        if !self.is_rendered(key) {
            return Err(SessionError::TopicNotRendered { key });
        }
        let row = self
            .framework
            .topic(key)
            .ok_or(SessionError::TopicNotRendered { key })?;
        let option = row.option(level);
        if let Some(previous) = self.selections.record(key, option.into()) {
            debug!(%key, from = %previous.level, to = %level, "selection replaced");
        }
        self.selections
            .get(key)
            .ok_or(SessionError::TopicNotRendered { key })
    }

    pub fn selection(&self, key: TopicKey) -> Option<&Selection> {
        self.selections.get(key)
    }

    /// Rendered topics that still have no selection.
    pub fn unanswered(&self) -> Vec<RenderedTopic<'a>> {
        self.rendered_topics()
            .into_iter()
            .filter(|topic| !self.selections.contains(topic.key))
            .collect()
    }

    /// Number of recorded selections that are not currently rendered.
    pub fn hidden_selection_count(&self) -> usize {
        self.selections
            .iter()
            .filter(|(key, _)| !self.is_rendered(*key))
            .count()
    }

    /// Answers for the currently rendered topics, one row per topic text.
    ///
    /// Rows follow rendering order. When the same topic text is rendered more
    /// than once, it yields a single row at its first position carrying the
    /// answer of its last occurrence.
    ///
    /// Fails if no domain is chosen or if any rendered topic is unanswered.
    pub fn results(&self) -> Result<Vec<ResultRow>, SessionError> {
        if self.domains.is_empty() {
            return Err(SessionError::NoDomainsSelected);
        }
        let mut rows: Vec<ResultRow> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut missing = Vec::new();
        for topic in self.rendered_topics() {
            let Some(selection) = self.selections.get(topic.key) else {
                missing.push(topic.row.topic.clone());
                continue;
            };
            let row = ResultRow {
                competency: topic.row.topic.clone(),
                level: selection.level,
                description: selection.description.clone(),
            };
            match positions.get(topic.row.topic.as_str()) {
                Some(&position) => rows[position] = row,
                None => {
                    positions.insert(topic.row.topic.as_str(), rows.len());
                    rows.push(row);
                }
            }
        }
        if !missing.is_empty() {
            return Err(SessionError::Unanswered { topics: missing });
        }
        Ok(rows)
    }
}
