//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// Create the readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - pings MongoDB
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "MongoDB is reachable"),
        (status = 503, description = "MongoDB is unreachable")
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = database::mongodb::check_health_detailed(&state.mongo_client).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    run_health_checks(checks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, Config, Environment};
    use axum::body::Body;
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::{Client, MongoConfig};
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use tower::ServiceExt;

    async fn unreachable_state() -> AppState {
        // Nothing listens on port 1; server selection gives up quickly
        let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";
        let client = Client::with_uri_str(url).await.unwrap();

        let config = Config {
            app: app_info!(),
            mongodb: MongoConfig::with_database(url, "catalog_test"),
            server: ServerConfig::default(),
            catalog: CatalogConfig {
                collection: "products".to_string(),
                seed_file: PathBuf::from("data/products.json"),
                seed_on_startup: false,
            },
            environment: Environment::Development,
        };

        AppState::new(config, client)
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_store() {
        let app = router(unreachable_state().await);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "not ready");
        assert_eq!(json["mongodb"], "disconnected");
    }
}
