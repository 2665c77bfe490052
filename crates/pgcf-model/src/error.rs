//! Error types for the competency model and assessment sessions.

use thiserror::Error;

use crate::framework::TopicKey;

/// Errors raised while interpreting model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Text that does not name a proficiency level.
    #[error("unknown proficiency level '{0}'")]
    UnknownLevel(String),
}

/// Errors raised by an [`AssessmentSession`](crate::AssessmentSession).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Results were requested before any domain was chosen.
    #[error("no domain selected")]
    NoDomainsSelected,

    /// A chosen domain header is not part of the framework.
    #[error("unknown domain '{header}'")]
    UnknownDomain { header: String },

    /// A chosen section index is outside the framework.
    #[error("no section at position {index}")]
    UnknownSection { index: usize },

    /// A selection targeted a topic that is not currently rendered.
    #[error("topic {key} is not part of the selected domains")]
    TopicNotRendered { key: TopicKey },

    /// Rendered topics are still missing a selection.
    #[error("{} topic(s) have no selected level: {}", topics.len(), topics.join(", "))]
    Unanswered { topics: Vec<String> },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
