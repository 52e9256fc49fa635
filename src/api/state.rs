use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::AppResult,
    models::Profile,
    services::{CachePolicy, SwipeSession, UpdateController},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SwipeSession>,
    /// The single user profile; held for the whole of a discovery run so
    /// concurrent loads never discover twice
    pub profile: Arc<Mutex<Profile>>,
    pub updates: Arc<RwLock<UpdateController>>,
    pub cache_policy: Arc<CachePolicy>,
}

impl AppState {
    /// Creates the state, loading the stored profile once
    pub async fn new(session: SwipeSession, cache_policy: CachePolicy) -> AppResult<Self> {
        let profile = session.store().load().await?;

        tracing::info!(
            backend = session.store().backend(),
            history = profile.history.len(),
            has_queue = profile.queue.is_some(),
            "Profile restored"
        );

        Ok(Self {
            session: Arc::new(session),
            profile: Arc::new(Mutex::new(profile)),
            updates: Arc::new(RwLock::new(UpdateController::new())),
            cache_policy: Arc::new(cache_policy),
        })
    }
}

/// The user's calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
