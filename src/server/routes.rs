//! Router configuration for the scrape service.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/scrape", post(handlers::scrape))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
