use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse, messages};

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        messages::NOT_FOUND_RESOURCE,
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}
