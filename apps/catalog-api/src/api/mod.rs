//! API routes module
//!
//! Everything is mounted at the root; `axum_helpers::create_router` adds the
//! documentation UIs and middleware around it.

pub mod health;

use axum::Router;
use axum_helpers::server::health_router;
use domain_products::handlers;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(handlers::router(state.products.clone()))
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone()))
}
