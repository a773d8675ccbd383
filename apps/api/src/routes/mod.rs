pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/brochures/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/brochures/optimize",
            post(handlers::handle_optimize),
        )
        .route(
            "/api/v1/brochures/validate",
            post(handlers::handle_validate),
        )
        .route("/api/v1/brochures/compact", post(handlers::handle_compact))
        .with_state(state)
}
