use axum::{extract::State, http::StatusCode, Extension, Json};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{HistoryEntry, Preferences, Theme},
    services::{
        review::ReviewSubmission,
        update::{CachePolicy, FetchStrategy, UpdateAction, UpdateEvent, UpdateStatus, WorkerMessage},
        SessionView, SwipeDecision, SwipeOutcome, UpdateController,
    },
};

use super::state::{today, AppState};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub decision: SwipeDecision,
}

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub tutorial_seen: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UpdateEventResponse {
    pub status: UpdateStatus,
    pub action: UpdateAction,
}

#[derive(Debug, Deserialize)]
pub struct FetchRouteRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FetchRouteResponse {
    pub strategy: FetchStrategy,
}

#[derive(Debug, Serialize)]
pub struct WorkerMessageResponse {
    pub skip_waiting: bool,
    pub status: UpdateStatus,
    pub action: UpdateAction,
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    /// Cache names currently held by the browser
    pub caches: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub cache_name: String,
    /// Caches the worker must delete
    pub stale: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") })),
    )
}

/// Loads the session, discovering today's queue if needed
pub async fn get_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SessionView>> {
    let mut profile = state.profile.lock().await;
    let view = state
        .session
        .open(&mut profile, today(), &mut Rng::new())
        .await
        .inspect_err(|e| tracing::error!(request_id = %request_id, error = %e, "Session load failed"))?;

    Ok(Json(view))
}

/// Replaces today's queue with a fresh discovery run
pub async fn refresh_queue(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SessionView>> {
    tracing::info!(request_id = %request_id, "Manual queue refresh");

    let mut profile = state.profile.lock().await;
    let view = state
        .session
        .refresh(&mut profile, today(), &mut Rng::new())
        .await?;

    Ok(Json(view))
}

pub async fn swipe(
    State(state): State<AppState>,
    Json(request): Json<SwipeRequest>,
) -> AppResult<Json<SwipeOutcome>> {
    let mut profile = state.profile.lock().await;
    let outcome = state
        .session
        .swipe(&mut profile, request.decision, today())
        .await?;

    Ok(Json(outcome))
}

pub async fn submit_review(
    State(state): State<AppState>,
    Json(submission): Json<ReviewSubmission>,
) -> AppResult<(StatusCode, Json<HistoryEntry>)> {
    let mut profile = state.profile.lock().await;
    let entry = state
        .session
        .submit_review(&mut profile, &submission, today())
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Reviewed titles, newest first
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    let profile = state.profile.lock().await;
    Json(profile.history.reviewed().into_iter().cloned().collect())
}

/// Forgets history, queue and pick
pub async fn reset(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    tracing::warn!(request_id = %request_id, "Profile reset requested");

    let mut profile = state.profile.lock().await;
    state.session.reset(&mut profile).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let profile = state.profile.lock().await;
    Json(profile.preferences.clone())
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> AppResult<Json<Preferences>> {
    let mut profile = state.profile.lock().await;

    let mut preferences = profile.preferences.clone();
    if let Some(theme) = update.theme {
        preferences.theme = theme;
    }
    if let Some(seen) = update.tutorial_seen {
        preferences.tutorial_seen = seen;
    }

    state.session.store().save_preferences(&preferences).await?;
    profile.preferences = preferences.clone();

    Ok(Json(preferences))
}

pub async fn get_update_status(State(state): State<AppState>) -> Json<UpdateController> {
    Json(state.updates.read().await.clone())
}

/// Feeds a lifecycle event into the update controller
pub async fn post_update_event(
    State(state): State<AppState>,
    Json(event): Json<UpdateEvent>,
) -> Json<UpdateEventResponse> {
    let mut updates = state.updates.write().await;
    let action = updates.handle(event);

    Json(UpdateEventResponse {
        status: updates.status(),
        action,
    })
}

/// Cache name and asset list for the offline worker
pub async fn get_cache_manifest(State(state): State<AppState>) -> Json<CachePolicy> {
    Json(state.cache_policy.as_ref().clone())
}

/// Which fetch strategy the worker should use for a URL
pub async fn route_fetch(
    State(state): State<AppState>,
    Json(request): Json<FetchRouteRequest>,
) -> Json<FetchRouteResponse> {
    Json(FetchRouteResponse {
        strategy: state.cache_policy.strategy_for(&request.url),
    })
}

/// Message posted to the worker; `skipWaiting` activates the waiting version
pub async fn worker_message(
    State(state): State<AppState>,
    Json(message): Json<WorkerMessage>,
) -> Json<WorkerMessageResponse> {
    let skip_waiting = message.is_skip_waiting();
    if skip_waiting {
        tracing::info!("skipWaiting received, activating new version");
    }

    let mut updates = state.updates.write().await;
    let action = updates.handle_message(&message);

    Json(WorkerMessageResponse {
        skip_waiting,
        status: updates.status(),
        action,
    })
}

/// Worker activation: every cache but the current version is stale
pub async fn activate_worker(
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Json<ActivateResponse> {
    let stale: Vec<String> = state
        .cache_policy
        .stale_caches(&request.caches)
        .into_iter()
        .map(str::to_string)
        .collect();

    for name in &stale {
        tracing::info!(cache = %name, "Removing old cache");
    }

    Json(ActivateResponse {
        cache_name: state.cache_policy.cache_name.clone(),
        stale,
    })
}
