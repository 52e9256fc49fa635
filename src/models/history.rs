use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Title;

/// What the user decided about a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Skipped,
    Reviewed,
}

/// One past decision, keyed by title id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub decision: Decision,
    /// Star rating from 1 to 5, only for reviewed titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub family_friendly: bool,
    #[serde(default)]
    pub repeat_watch: bool,
    pub date: NaiveDate,
}

impl HistoryEntry {
    pub fn skipped(title: &Title, date: NaiveDate) -> Self {
        Self {
            id: title.id.clone(),
            title: title.name.clone(),
            decision: Decision::Skipped,
            user_rating: None,
            family_friendly: false,
            repeat_watch: false,
            date,
        }
    }
}

/// Log of all past decisions with at most one entry per title id.
///
/// Stored as a plain list; loading replays it through [`History::record`]
/// so a stored list with repeated ids keeps only the latest entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            history.record(entry);
        }
        history
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry, replacing any previous entry for the same id
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push(entry);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Ids of every title ever decided on
    pub fn ids(&self) -> HashSet<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Reviewed entries, most recent first
    pub fn reviewed(&self) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.decision == Decision::Reviewed && e.user_rating.is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
