use serde::{Deserialize, Serialize};

use super::{DailyQueue, History, Title};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Display preferences kept alongside the discovery state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub tutorial_seen: bool,
}

/// Everything the app remembers about its user.
///
/// Loaded once through [`crate::services::persistence::ProfileStore`] and
/// saved back after each mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub queue: Option<DailyQueue>,
    pub history: History,
    /// Title accepted from the queue and awaiting a review
    pub picked: Option<Title>,
    pub preferences: Preferences,
}

impl Profile {
    pub fn has_pending_review(&self) -> bool {
        self.picked.is_some()
    }

    /// Forgets queue, picked title and history. Preferences survive.
    pub fn reset(&mut self) {
        self.queue = None;
        self.picked = None;
        self.history.clear();
    }
}
