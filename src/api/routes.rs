//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Service info and health
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Optimization endpoints
        .route("/optimize", post(handlers::optimize))
        .route("/simulate", post(handlers::simulate))
        .with_state(state)
}
