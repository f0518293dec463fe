//! Standard error messages for consistent error responses.

pub const INVALID_ID: &str = "Invalid product id.";
pub const NOT_FOUND_RESOURCE: &str = "Requested resource was not found.";

/// Body of every plain-text 500 response
pub const SERVER_ERROR: &str = "Server error";
