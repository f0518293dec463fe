//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Service-level documentation: metadata plus the liveness and readiness probes
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        version = "0.1.0",
        description = "Product catalog backed by MongoDB: filtered listing, CRUD and an inventory report",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        axum_helpers::server::health::health_handler,
        crate::api::health::readiness_check
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes")
    )
)]
struct ServiceDoc;

/// Combined OpenAPI documentation for all APIs
///
/// Product routes are served at the root, so the domain document is merged
/// rather than nested under a prefix.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = ServiceDoc::openapi();
        doc.merge(domain_products::ApiDoc::openapi());
        doc
    }
}
