use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Discovery & swiping
        .route("/session", get(handlers::get_session))
        .route("/queue/refresh", post(handlers::refresh_queue))
        .route("/swipe", post(handlers::swipe))
        .route("/review", post(handlers::submit_review))
        // History
        .route("/history", get(handlers::get_history))
        .route("/reset", post(handlers::reset))
        // Preferences
        .route(
            "/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        // App updates
        .route("/update", get(handlers::get_update_status))
        .route("/update/events", post(handlers::post_update_event))
        .route("/update/manifest", get(handlers::get_cache_manifest))
        .route("/update/route", post(handlers::route_fetch))
        .route("/update/message", post(handlers::worker_message))
        .route("/update/activate", post(handlers::activate_worker))
}
