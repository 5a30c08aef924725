//! Health check endpoint handlers.

use std::collections::HashMap;

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};

use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Summary with version and component checks
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

/// Returns `200` with the summary when healthy, `503` with the same body
/// otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let notifier = check_notifier(&state).await;
    let status = notifier.status;

    let response = HealthResponse {
        status,
        version: state.application.version.clone(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks: HashMap::from([("notifier".to_string(), notifier)]),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

/// Ready once the webhook provider accepts its configuration.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_notifier(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_notifier(state: &AppState) -> ComponentHealth {
    match state.notifications.validate().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some(state.notifications.provider_name().to_string()),
        },
        Err(e) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
    }
}
