//! Custom extractors for Axum handlers.
//!
//! Reusable extractors that reduce boilerplate and keep rejection bodies in
//! the shared [`ErrorResponse`](crate::errors::ErrorResponse) shape.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
