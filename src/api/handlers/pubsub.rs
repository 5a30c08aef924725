//! Pub/Sub push endpoint.
//!
//! Each push carries one cluster notification. A 2xx response acknowledges
//! it; any other status makes Pub/Sub redeliver the message later.

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::api::dto::PushRequest;
use crate::api::middleware::{RequestId, error_to_response_with_request_id, handle_json_rejection};
use crate::error::AppResult;
use crate::services::notifications::NotificationResult;
use crate::state::AppState;

/// Creates push routes.
///
/// # Routes
/// - `POST /` - push endpoint at the service root
/// - `POST /pubsub/push` - same endpoint under an explicit path
pub fn pubsub_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(receive_push))
        .route("/pubsub/push", post(receive_push))
}

/// Handles one push delivery.
///
/// # Responses
/// - `204 No Content` - message formatted and delivered
/// - `400 Bad Request` - body is not a push request or data is not base64
/// - `422 Unprocessable Entity` - upgrade payload cannot be formatted
/// - `502 Bad Gateway` - webhook unreachable or rejected the message
pub async fn receive_push(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PushRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected malformed push request");
            return handle_json_rejection(rejection);
        }
    };

    match process_push(&state, request).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to process push delivery");
            error_to_response_with_request_id(e, Some(request_id.0))
        }
    }
}

async fn process_push(state: &AppState, request: PushRequest) -> AppResult<NotificationResult> {
    let message_id = request.message.message_id.clone().unwrap_or_default();
    tracing::info!(
        message_id = %message_id,
        subscription = request.subscription.as_deref().unwrap_or_default(),
        "Push delivery received"
    );

    let envelope = request.message.into_envelope()?;
    state.notifications.handle(&envelope).await
}
