use std::fmt::Display;

use crate::error::AppResult;

/// Keys of the persisted profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Queue,
    QueueDate,
    History,
    Picked,
    Theme,
    TutorialSeen,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreKey::Queue => "queue",
            StoreKey::QueueDate => "date",
            StoreKey::History => "history",
            StoreKey::Picked => "picked",
            StoreKey::Theme => "theme",
            StoreKey::TutorialSeen => "tutorial_seen",
        };
        write!(f, "filmyfool_{}", name)
    }
}

/// String key/value storage backing both the profile and the response cache
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Stores a value that expires after `ttl` seconds
    async fn set_ex(&self, key: &str, value: &str, ttl: u64) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
