//! Error handler for converting AppError to HTTP responses.
//!
//! A non-2xx answer to a push makes Pub/Sub redeliver the message, so the
//! status codes here decide what gets retried.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, None)
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
///
/// | Variant | Status |
/// |---|---|
/// | `PayloadParse`, `StructureNotFound` | 422 |
/// | `Delivery` | 502 |
/// | `Validation`, `BadRequest` | 400 |
/// | `ConfigurationMissing`, `Config`, `Internal` | 500 |
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::PayloadParse { .. } | AppError::StructureNotFound { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AppError::Delivery { .. } => StatusCode::BAD_GATEWAY,
        AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ConfigurationMissing { .. }
        | AppError::Config(_)
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
        AppError::Config(_) => "CONFIGURATION_ERROR",
        AppError::PayloadParse { .. } => "PAYLOAD_PARSE_ERROR",
        AppError::StructureNotFound { .. } => "STRUCTURE_NOT_FOUND",
        AppError::Delivery { .. } => "DELIVERY_FAILED",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::ConfigurationMissing { key } => {
            ErrorResponse::new(code, error.to_string()).with_details(json!({ "key": key }))
        }
        AppError::StructureNotFound {
            resource_type,
            resource,
        } => ErrorResponse::new(code, error.to_string()).with_details(json!({
            "resource_type": resource_type,
            "resource": resource,
        })),
        AppError::Delivery {
            status_code: Some(status),
            ..
        } => ErrorResponse::new(code, "Webhook rejected the message")
            .with_details(json!({ "status_code": status })),
        AppError::Delivery { .. } => ErrorResponse::new(code, "Webhook could not be reached"),
        AppError::Validation { field, reason } => {
            ErrorResponse::new(code, format!("Validation failed for field '{}'", field))
                .with_details(json!({ "field": field, "reason": reason }))
        }
        // Config and internal failures may carry paths or upstream detail
        AppError::Config(_) => ErrorResponse::new(code, "Service is misconfigured"),
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
        AppError::PayloadParse { .. } | AppError::BadRequest { .. } => {
            ErrorResponse::new(code, error.to_string())
        }
    }
}

/// Builds the HTTP response for an error, tagging it with the request ID
/// when one is known.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let status = error_to_status_code(&error);
    let mut body = error_body(&error);

    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

/// Converts axum JSON rejection errors to ErrorResponse.
///
/// Every rejection is answered with 400.
pub fn handle_json_rejection(rejection: JsonRejection) -> Response {
    let body = match rejection {
        JsonRejection::JsonDataError(err) => {
            ErrorResponse::new("INVALID_PUSH_BODY", "Body is not a Pub/Sub push request")
                .with_details(json!({ "error": err.body_text() }))
        }
        JsonRejection::JsonSyntaxError(err) => {
            ErrorResponse::new("JSON_SYNTAX_ERROR", "JSON syntax error")
                .with_details(json!({ "error": err.body_text() }))
        }
        JsonRejection::MissingJsonContentType(_) => ErrorResponse::new(
            "MISSING_CONTENT_TYPE",
            "Missing or invalid Content-Type header",
        )
        .with_details(json!({ "expected": "application/json" })),
        JsonRejection::BytesRejection(_) => {
            ErrorResponse::new("BODY_READ_ERROR", "Failed to read request body")
        }
        _ => ErrorResponse::new("JSON_ERROR", "Failed to parse JSON request"),
    };

    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
