//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    handlers::health::init_server_start();

    Router::new()
        .nest("/api/v1", api_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/sessions", session_routes())
        .nest("/feedback", feedback_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/@me", get(handlers::user::get_current_user))
        .route("/{user_id}", get(handlers::user::get_user))
}

/// Session routes
fn session_routes() -> Router<AppState> {
    use handlers::{feedback, participation, session};

    Router::new()
        .route("/", get(session::list_sessions).post(session::create_session))
        .route(
            "/{session_id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route(
            "/{session_id}/members/{user_id}",
            delete(session::remove_member),
        )
        .route("/{session_id}/join", post(session::join_session))
        .route("/{session_id}/leave", post(session::leave_session))
        .route("/{session_id}/start", post(session::start_session))
        .route("/{session_id}/pause", post(session::pause_session))
        .route("/{session_id}/resume", post(session::resume_session))
        .route("/{session_id}/end", post(session::end_session))
        .route("/{session_id}/timer", get(session::get_timer))
        .route("/{session_id}/events", post(participation::record_event))
        .route(
            "/{session_id}/messages",
            get(participation::get_messages).post(participation::send_message),
        )
        .route("/{session_id}/participation", get(participation::get_participation))
        .route(
            "/{session_id}/feedback",
            get(feedback::get_session_feedback).post(feedback::submit_feedback),
        )
}

/// Feedback routes for the current user
fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/given", get(handlers::feedback::get_feedback_given))
        .route("/received", get(handlers::feedback::get_feedback_received))
        .route(
            "/received/summary",
            get(handlers::feedback::get_received_summary),
        )
}
