use std::sync::Arc;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    db::{KeyValueStore, StoreKey},
    error::AppResult,
    models::{DailyQueue, History, Preferences, Profile, Theme, Title},
};

/// Load/save boundary between a [`Profile`] and the key/value store.
///
/// Each profile field lives under its own key so a mutation only rewrites
/// what changed. Unreadable values are logged and treated as absent.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub async fn load(&self) -> AppResult<Profile> {
        let titles: Option<Vec<Title>> = self.read_json(StoreKey::Queue).await?;
        let date = self
            .store
            .get(&StoreKey::QueueDate.to_string())
            .await?
            .and_then(|raw| raw.parse::<NaiveDate>().ok());

        let queue = match (titles, date) {
            (Some(titles), Some(date)) => Some(DailyQueue::new(date, titles)),
            _ => None,
        };

        let history: History = self.read_json(StoreKey::History).await?.unwrap_or_default();
        let picked: Option<Title> = self.read_json(StoreKey::Picked).await?;
        let theme: Theme = self.read_json(StoreKey::Theme).await?.unwrap_or_default();
        let tutorial_seen: bool = self
            .read_json(StoreKey::TutorialSeen)
            .await?
            .unwrap_or_default();

        tracing::debug!(
            backend = self.store.name(),
            has_queue = queue.is_some(),
            history = history.len(),
            picked = picked.is_some(),
            "Profile loaded"
        );

        Ok(Profile {
            queue,
            history,
            picked,
            preferences: Preferences {
                theme,
                tutorial_seen,
            },
        })
    }

    pub async fn save_queue(&self, queue: Option<&DailyQueue>) -> AppResult<()> {
        match queue {
            Some(queue) => {
                self.write_json(StoreKey::Queue, &queue.titles).await?;
                self.store
                    .set(&StoreKey::QueueDate.to_string(), &queue.date.to_string())
                    .await
            }
            None => {
                self.store.remove(&StoreKey::Queue.to_string()).await?;
                self.store.remove(&StoreKey::QueueDate.to_string()).await
            }
        }
    }

    pub async fn save_history(&self, history: &History) -> AppResult<()> {
        self.write_json(StoreKey::History, history).await
    }

    pub async fn save_picked(&self, picked: Option<&Title>) -> AppResult<()> {
        match picked {
            Some(title) => self.write_json(StoreKey::Picked, title).await,
            None => self.store.remove(&StoreKey::Picked.to_string()).await,
        }
    }

    pub async fn save_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        self.write_json(StoreKey::Theme, &preferences.theme).await?;
        self.write_json(StoreKey::TutorialSeen, &preferences.tutorial_seen)
            .await
    }

    /// Writes every field of the profile
    pub async fn save(&self, profile: &Profile) -> AppResult<()> {
        self.save_queue(profile.queue.as_ref()).await?;
        self.save_history(&profile.history).await?;
        self.save_picked(profile.picked.as_ref()).await?;
        self.save_preferences(&profile.preferences).await
    }

    async fn read_json<T: DeserializeOwned>(&self, key: StoreKey) -> AppResult<Option<T>> {
        let Some(raw) = self.store.get(&key.to_string()).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding unreadable stored value");
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(&key.to_string(), &json).await
    }
}
