//! # foundry-api
//!
//! HTTP API server for the Foundry lost-and-found service.
//!
//! The library target exposes the router, handlers, and services so
//! integration tests can exercise the full HTTP surface against mock
//! collaborators; the binary wires real collaborators in `main.rs`.

pub mod error;
pub mod handlers;
pub mod query_types;
pub mod services;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

pub use error::ApiError;
pub use state::{AppState, GlobalRateLimiter};

/// Liveness probe.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "message": "Foundry server is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Global rate limit gate; passes through when limiting is disabled.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too many requests. Please wait before retrying.",
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

/// Build the application router (routes only; the binary adds the
/// middleware stack).
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Reports
        .route(
            "/api/items/lost",
            post(handlers::items::create_lost_item).get(handlers::items::list_lost_items),
        )
        .route(
            "/api/items/found",
            post(handlers::items::create_found_item).get(handlers::items::list_found_items),
        )
        // Discovery
        .route("/api/items/discover", get(handlers::items::discover_items))
        // Per-contact listing
        .route("/api/items/user/:email", get(handlers::items::list_user_items))
        // Deletion
        .route("/api/items/:id", delete(handlers::items::delete_item))
        // User profiles (mock persistence)
        .route("/api/auth/create-user", post(handlers::auth::create_user))
        // Image hosting
        .route("/api/upload/upload", post(handlers::upload::upload_image))
        .route(
            "/api/upload/delete/:public_id",
            delete(handlers::upload::delete_image),
        )
        .with_state(state)
}
