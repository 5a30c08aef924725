//! Router configuration for the API.

use axum::{Router, middleware};

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// Middleware runs outermost first: request ID, then logging, so every log
/// line of a request carries its ID.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::pubsub::pubsub_routes())
        .merge(handlers::health::health_routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
