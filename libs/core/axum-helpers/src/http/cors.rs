use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Comma-separated list of origins allowed to call the API
pub const CORS_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer for the catalog API.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Reads allowed origins from `CORS_ALLOWED_ORIGIN`.
///
/// Returns `Ok(None)` when the variable is unset or blank, in which case no
/// CORS layer is installed. Unparsable origins are an `InvalidInput` error.
pub fn cors_origins_from_env() -> io::Result<Option<Vec<HeaderValue>>> {
    let Ok(raw) = std::env::var(CORS_ORIGIN_ENV) else {
        return Ok(None);
    };

    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ORIGIN_ENV} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Ok(None);
    }

    Ok(Some(origins))
}
