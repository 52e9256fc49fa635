use chrono::NaiveDate;
use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{DailyQueue, HistoryEntry, Profile, Title},
    services::{
        discovery::DiscoveryEngine,
        persistence::ProfileStore,
        review::{self, ReviewSubmission},
    },
};

/// What happens once today's queue has been swiped through
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueuePolicy {
    /// Keep showing "all caught up" until the date changes
    #[default]
    ComeBackTomorrow,
    /// Run discovery again straight away
    Rediscover,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDecision {
    Accept,
    Reject,
}

/// Where the user currently is
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionView {
    /// A picked title is waiting for its review
    Review { title: Title },
    /// Today's queue with cards left
    Presenting { queue: DailyQueue },
    /// Today's queue is drained
    Empty,
    /// No queue for today yet
    NeedsDiscovery,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwipeOutcome {
    Picked { title: Title },
    Skipped { title: Title, remaining: usize },
}

/// Drives the daily queue: discovery, swipes and reviews.
///
/// Every mutation of the [`Profile`] is written through the
/// [`ProfileStore`] before returning.
pub struct SwipeSession {
    store: ProfileStore,
    engine: DiscoveryEngine,
    empty_policy: EmptyQueuePolicy,
}

impl SwipeSession {
    pub fn new(store: ProfileStore, engine: DiscoveryEngine, empty_policy: EmptyQueuePolicy) -> Self {
        Self {
            store,
            engine,
            empty_policy,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Routes a profile to its view without side effects
    pub fn view(profile: &Profile, today: NaiveDate) -> SessionView {
        if let Some(title) = &profile.picked {
            return SessionView::Review {
                title: title.clone(),
            };
        }

        match &profile.queue {
            Some(queue) if queue.is_for(today) && !queue.is_empty() => SessionView::Presenting {
                queue: queue.clone(),
            },
            Some(queue) if queue.is_for(today) => SessionView::Empty,
            _ => SessionView::NeedsDiscovery,
        }
    }

    /// Opens the app for `today`, discovering a fresh queue when needed.
    ///
    /// A non-empty queue generated today is reused as stored.
    pub async fn open(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
        rng: &mut Rng,
    ) -> AppResult<SessionView> {
        match Self::view(profile, today) {
            SessionView::NeedsDiscovery => self.discover(profile, today, rng).await,
            SessionView::Empty if self.empty_policy == EmptyQueuePolicy::Rediscover => {
                self.discover(profile, today, rng).await
            }
            view => Ok(view),
        }
    }

    /// Replaces the queue regardless of its date
    pub async fn refresh(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
        rng: &mut Rng,
    ) -> AppResult<SessionView> {
        if profile.has_pending_review() {
            return Err(AppError::ReviewPending);
        }
        self.discover(profile, today, rng).await
    }

    async fn discover(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
        rng: &mut Rng,
    ) -> AppResult<SessionView> {
        let titles = self.engine.discover(&profile.history.ids(), rng).await?;
        let queue = DailyQueue::new(today, titles);

        self.store.save_queue(Some(&queue)).await?;

        tracing::info!(
            date = %today,
            size = queue.len(),
            catalog = self.engine.catalog_name(),
            "Daily queue ready"
        );

        profile.queue = Some(queue);
        Ok(Self::view(profile, today))
    }

    /// Applies a decision to the top card of today's queue.
    ///
    /// The decision is written before the shortened queue and the profile
    /// only changes after each write succeeds, so a failed write never
    /// drops the title.
    pub async fn swipe(
        &self,
        profile: &mut Profile,
        decision: SwipeDecision,
        today: NaiveDate,
    ) -> AppResult<SwipeOutcome> {
        if profile.has_pending_review() {
            return Err(AppError::ReviewPending);
        }

        let mut queue = profile
            .queue
            .clone()
            .filter(|q| q.is_for(today))
            .ok_or_else(|| AppError::NotFound("No queue for today".to_string()))?;
        let title = queue
            .pop()
            .ok_or_else(|| AppError::NotFound("Today's queue is empty".to_string()))?;
        let remaining = queue.len();

        let outcome = match decision {
            SwipeDecision::Accept => {
                self.store.save_picked(Some(&title)).await?;
                profile.picked = Some(title.clone());
                tracing::info!(title_id = %title.id, "Title picked");
                SwipeOutcome::Picked { title }
            }
            SwipeDecision::Reject => {
                let mut history = profile.history.clone();
                history.record(HistoryEntry::skipped(&title, today));
                self.store.save_history(&history).await?;
                profile.history = history;
                tracing::info!(title_id = %title.id, remaining, "Title skipped");
                SwipeOutcome::Skipped { title, remaining }
            }
        };

        self.store.save_queue(Some(&queue)).await?;
        profile.queue = Some(queue);

        Ok(outcome)
    }

    /// Records the review of the picked title and clears the pick
    pub async fn submit_review(
        &self,
        profile: &mut Profile,
        submission: &ReviewSubmission,
        today: NaiveDate,
    ) -> AppResult<HistoryEntry> {
        let picked = profile
            .picked
            .as_ref()
            .ok_or_else(|| AppError::NotFound("No picked title to review".to_string()))?;
        let entry = review::capture(picked, submission, today)?;

        // History first: if clearing the pick fails, resubmitting replaces
        // the same entry
        let mut history = profile.history.clone();
        history.record(entry.clone());
        self.store.save_history(&history).await?;
        profile.history = history;

        self.store.save_picked(None).await?;
        profile.picked = None;

        tracing::info!(
            title_id = %entry.id,
            rating = ?entry.user_rating,
            "Review recorded"
        );

        Ok(entry)
    }

    /// Forgets history, queue and pick
    pub async fn reset(&self, profile: &mut Profile) -> AppResult<()> {
        let mut cleared = profile.clone();
        cleared.reset();
        self.store.save(&cleared).await?;
        *profile = cleared;
        tracing::warn!("Profile reset");
        Ok(())
    }
}
