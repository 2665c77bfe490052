//! Competency self-assessment data model.
//!
//! # Module Organization
//!
//! - [`level`]: proficiency levels and the options rendered for a topic
//! - [`framework`]: sections, topic rows and topic keys
//! - [`respondent`]: identity, job title and role metadata
//! - [`selection`]: recorded answers
//! - [`session`]: per-respondent assessment state

pub mod error;
pub mod framework;
pub mod level;
pub mod respondent;
pub mod selection;
pub mod session;

pub use error::{ModelError, Result, SessionError};
pub use framework::{Framework, Section, TopicKey, TopicRow};
pub use level::{
    LevelOption, NOT_APPLICABLE_DESCRIPTION, PLACEHOLDER_DESCRIPTION, ProficiencyLevel,
    UNFAMILIAR_DESCRIPTION,
};
pub use respondent::Respondent;
pub use selection::{Selection, SelectionSet};
pub use session::{AssessmentSession, RenderedTopic, ResultRow};
