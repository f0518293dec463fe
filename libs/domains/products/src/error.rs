use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{errors::messages::SERVER_ERROR, AppError};
use thiserror::Error;

/// Client-facing message for an unknown product id
pub const NOT_FOUND_MESSAGE: &str = "Product with the given id does not exist.";

/// Client-facing message for a name collision
pub const DUPLICATE_NAME_MESSAGE: &str = "A product with the given name already exists.";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Product with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            ProductError::DuplicateName(_) => {
                AppError::BadRequest(DUPLICATE_NAME_MESSAGE.to_string())
            }
            ProductError::Database(msg) => AppError::InternalServerError(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Client errors use the shared JSON body; store failures are logged and
/// answered with a bare plain-text 500.
impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::Database(ref cause) | ProductError::Internal(ref cause) => {
                tracing::error!(error = %cause, "Product request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
            }
            other => AppError::from(other).into_response(),
        }
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
