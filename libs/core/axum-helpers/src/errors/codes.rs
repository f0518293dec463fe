//! Error codes carried in every JSON error body.
//!
//! Clients match on the string form; logs and dashboards use the integer.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
//! assert_eq!(ErrorCode::InvalidId.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A body field failed its validation rule
    ValidationError,
    /// The `{id}` path segment is not an integer
    InvalidId,
    /// The body is not JSON or does not have the expected shape
    JsonExtraction,
    /// No product or route matched
    NotFound,
    /// Unexpected failure, details stay in the logs
    InternalError,
    /// A business rule refused the request, e.g. a taken product name
    BadRequest,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
        }
    }

    /// Integer form; client errors live in 1000-1999
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1012,
        }
    }

    /// Message used when the error carries none of its own
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::BadRequest => "Bad request",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_lookup_codes() {
        assert_eq!(ErrorCode::NotFound.code(), 1004);
        assert_eq!(ErrorCode::InvalidId.to_string(), "INVALID_ID");
        assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
    }

    #[test]
    fn test_serialized_form_is_the_client_identifier() {
        let json = serde_json::to_string(&ErrorCode::JsonExtraction).unwrap();
        assert_eq!(json, "\"JSON_EXTRACTION\"");
    }
}
