//! Proficiency levels offered for every competency topic.
//!
//! The framework table carries one description column per assessed level
//! (a Bloom-style taxonomy). Every rendered topic additionally offers the
//! synthetic [`ProficiencyLevel::NotApplicable`] choice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Description shown when the framework leaves a level cell empty.
pub const PLACEHOLDER_DESCRIPTION: &str = "n/A";

/// Fixed description for [`ProficiencyLevel::Unfamiliar`], regardless of source content.
pub const UNFAMILIAR_DESCRIPTION: &str = "I have not encountered this concept before or have had limited education or training in this area";

/// Fixed description for [`ProficiencyLevel::NotApplicable`].
pub const NOT_APPLICABLE_DESCRIPTION: &str = "Not applicable";

/// Self-assessed proficiency tier.
///
/// Variants are declared in rendering order, so the derived `Ord` matches
/// the order options are presented in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ProficiencyLevel {
    Unfamiliar,
    Remember,
    Understand,
    Apply,
    Analyse,
    Evaluate,
    Create,
    /// Synthetic level appended to every topic.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl ProficiencyLevel {
    /// Levels that have a description column in the framework table.
    pub const ASSESSED: [ProficiencyLevel; 7] = [
        Self::Unfamiliar,
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyse,
        Self::Evaluate,
        Self::Create,
    ];

    /// Every selectable level in rendering order.
    pub const ALL: [ProficiencyLevel; 8] = [
        Self::Unfamiliar,
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyse,
        Self::Evaluate,
        Self::Create,
        Self::NotApplicable,
    ];

    /// Returns the level name as used in table headers and exports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unfamiliar => "Unfamiliar",
            Self::Remember => "Remember",
            Self::Understand => "Understand",
            Self::Apply => "Apply",
            Self::Analyse => "Analyse",
            Self::Evaluate => "Evaluate",
            Self::Create => "Create",
            Self::NotApplicable => "N/A",
        }
    }

    /// Returns true for levels backed by a framework column.
    pub const fn is_assessed(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    /// Description that replaces any source text for this level, if one applies.
    pub const fn fixed_description(&self) -> Option<&'static str> {
        match self {
            Self::Unfamiliar => Some(UNFAMILIAR_DESCRIPTION),
            Self::NotApplicable => Some(NOT_APPLICABLE_DESCRIPTION),
            _ => None,
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = ModelError;

    /// Parses a level name (case-insensitive). `N/A` and `NA` both map to
    /// [`ProficiencyLevel::NotApplicable`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "UNFAMILIAR" => Ok(Self::Unfamiliar),
            "REMEMBER" => Ok(Self::Remember),
            "UNDERSTAND" => Ok(Self::Understand),
            "APPLY" => Ok(Self::Apply),
            "ANALYSE" | "ANALYZE" => Ok(Self::Analyse),
            "EVALUATE" => Ok(Self::Evaluate),
            "CREATE" => Ok(Self::Create),
            "N/A" | "NA" => Ok(Self::NotApplicable),
            _ => Err(ModelError::UnknownLevel(s.to_string())),
        }
    }
}

/// One selectable option rendered for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOption {
    pub level: ProficiencyLevel,
    pub description: String,
}

impl LevelOption {
    /// Display label in the form `Level: description`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.level, self.description)
    }
}
