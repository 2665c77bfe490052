//! Free-text details identifying who completed the assessment.

use serde::{Deserialize, Serialize};

/// Respondent metadata written at the top of every export.
///
/// Every field is optional in practice; unset fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Respondent {
    /// Name or staff identifier, e.g. `"JS-001"`.
    pub identity: String,
    pub job_title: String,
    /// Role description.
    pub role: String,
}

impl Respondent {
    pub fn new(
        identity: impl Into<String>,
        job_title: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            job_title: job_title.into(),
            role: role.into(),
        }
    }
}
