//! Recorded answers, one per topic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::framework::TopicKey;
use crate::level::{LevelOption, ProficiencyLevel};

/// The level chosen for a topic together with the description shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub level: ProficiencyLevel,
    pub description: String,
}

impl From<LevelOption> for Selection {
    fn from(option: LevelOption) -> Self {
        Self {
            level: option.level,
            description: option.description,
        }
    }
}

/// Answers keyed by topic position.
///
/// Re-selecting a topic overwrites its entry; entries are never removed.
/// Iteration follows [`TopicKey`] order, which is rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: BTreeMap<TopicKey, Selection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection, returning the entry it replaced.
    pub fn record(&mut self, key: TopicKey, selection: Selection) -> Option<Selection> {
        self.entries.insert(key, selection)
    }

    pub fn get(&self, key: TopicKey) -> Option<&Selection> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: TopicKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopicKey, &Selection)> + '_ {
        self.entries.iter().map(|(key, selection)| (*key, selection))
    }
}
