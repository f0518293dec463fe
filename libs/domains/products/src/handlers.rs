//! HTTP handlers for Products API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{
    errors::{
        responses::{
            BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
            NotFoundResponse,
        },
        ErrorResponse,
    },
    IdPath, ValidatedJson,
};
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, InventoryReport, MessageResponse, Product, UpdateOutcome, UpdateProduct,
};
use crate::query::{ProductFilter, ProductQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const CREATED_MESSAGE: &str = "Product added successfully.";
pub const UPDATED_MESSAGE: &str = "Product updated successfully.";
pub const UNCHANGED_MESSAGE: &str = "No changes made to product.";
pub const DELETED_MESSAGE: &str = "Product deleted successfully.";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        update_product,
        delete_product,
        inventory_report,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, InventoryReport, MessageResponse, ErrorResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Inventory", description = "Catalog-wide stock totals")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<ProductService<R>>;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/inventory-report", get(inventory_report))
        .with_state(service)
}

/// List products with optional filters
///
/// `name` is a case-insensitive substring match; numeric bounds are inclusive.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): SharedService<R>,
    Query(query): Query<ProductQuery>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products(ProductFilter::from(query)).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = MessageResponse),
        (status = 400, description = "Name already exists or invalid body", body = ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(CREATED_MESSAGE))))
}

/// Update some fields of a product
///
/// Absent or `null` fields keep their stored value.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Update applied, message says whether anything changed", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): SharedService<R>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<MessageResponse>> {
    let message = match service.update_product(id, input).await? {
        UpdateOutcome::Modified => UPDATED_MESSAGE,
        UpdateOutcome::Unchanged => UNCHANGED_MESSAGE,
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): SharedService<R>,
    IdPath(id): IdPath,
) -> ProductResult<Json<MessageResponse>> {
    service.delete_product(id).await?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}

/// Total quantity and stock value across the catalog
#[utoipa::path(
    get,
    path = "/inventory-report",
    tag = "Inventory",
    responses(
        (status = 200, description = "Inventory totals", body = InventoryReport),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn inventory_report<R: ProductRepository>(
    State(service): SharedService<R>,
) -> ProductResult<Json<InventoryReport>> {
    let report = service.inventory_report().await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn widget() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            price: 5.0,
            description: "A small widget".to_string(),
            quantity: 2,
            unit: "pcs".to_string(),
        }
    }

    fn app(mock: MockProductRepository) -> Router {
        router(ProductService::new(mock))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_bytes(body: Body) -> Vec<u8> {
        body.collect().await.unwrap().to_bytes().to_vec()
    }

    async fn json_body(body: Body) -> Value {
        serde_json::from_slice(&body_bytes(body).await).unwrap()
    }

    #[tokio::test]
    async fn test_list_products_without_filters() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .withf(|f| f.is_empty())
            .returning(|_| Ok(vec![widget()]));

        let response = app(mock)
            .oneshot(empty_request("GET", "/products"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response.into_body()).await;
        assert_eq!(
            json,
            json!([{
                "id": 1, "name": "Widget", "price": 5.0,
                "description": "A small widget", "quantity": 2, "unit": "pcs"
            }])
        );
    }

    #[tokio::test]
    async fn test_list_products_builds_filter_from_query() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .withf(|f| {
                f.name.as_deref() == Some("wid")
                    && f.min_price == Some(crate::query::QueryBound::Value(1.0))
                    && f.max_quantity == Some(crate::query::QueryBound::Value(10))
                    && f.max_price.is_none()
            })
            .returning(|_| Ok(vec![]));

        let response = app(mock)
            .oneshot(empty_request(
                "GET",
                "/products?name=wid&minPrice=1&maxQuantity=10&maxPrice=",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response.into_body()).await, json!([]));
    }

    #[tokio::test]
    async fn test_list_products_store_failure_is_plain_text_500() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .returning(|_| Err(ProductError::Database("connection refused".to_string())));

        let response = app(mock)
            .oneshot(empty_request("GET", "/products"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response.into_body()).await, b"Server error");
    }

    #[tokio::test]
    async fn test_create_product_returns_201() {
        let mut mock = MockProductRepository::new();
        mock.expect_exists_by_name().returning(|_| Ok(false));
        mock.expect_create()
            .withf(|p| *p == widget())
            .times(1)
            .returning(Ok);

        let response = app(mock)
            .oneshot(json_request(
                "POST",
                "/products",
                json!({
                    "id": 1, "name": "Widget", "price": 5, "description": "A small widget",
                    "quantity": 2, "unit": "pcs"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"message": CREATED_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_create_product_duplicate_name_returns_400() {
        let mut mock = MockProductRepository::new();
        mock.expect_exists_by_name().returning(|_| Ok(true));
        mock.expect_create().never();

        let response = app(mock)
            .oneshot(json_request(
                "POST",
                "/products",
                json!({
                    "id": 2, "name": "Widget", "price": 1.0, "description": "",
                    "quantity": 1, "unit": "pcs"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response.into_body()).await;
        assert_eq!(json["message"], crate::error::DUPLICATE_NAME_MESSAGE);
    }

    #[tokio::test]
    async fn test_create_product_missing_field_is_rejected() {
        let mut mock = MockProductRepository::new();
        mock.expect_exists_by_name().never();

        let response = app(mock)
            .oneshot(json_request("POST", "/products", json!({"name": "Widget"})))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_update_product_modified_message() {
        let mut mock = MockProductRepository::new();
        mock.expect_update()
            .withf(|id, changes| {
                *id == 1 && changes.price == Some(9.5) && changes.name.is_none()
            })
            .returning(|_, _| Ok(Some(widget())));

        let response = app(mock)
            .oneshot(json_request("PUT", "/products/1", json!({"price": "9.5"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"message": UPDATED_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_update_product_unchanged_message() {
        let mut mock = MockProductRepository::new();
        mock.expect_update().returning(|_, _| Ok(Some(widget())));

        let response = app(mock)
            .oneshot(json_request("PUT", "/products/1", json!({"unit": "pcs"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"message": UNCHANGED_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_update_product_unreadable_values_keep_stored_fields() {
        for body in [json!({"name": ""}), json!({"price": "cheap"})] {
            let mut mock = MockProductRepository::new();
            mock.expect_update().never();
            mock.expect_get_by_id()
                .withf(|id| *id == 1)
                .times(1)
                .returning(|_| Ok(Some(widget())));

            let response = app(mock)
                .oneshot(json_request("PUT", "/products/1", body.clone()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "body {body}");
            assert_eq!(
                json_body(response.into_body()).await,
                json!({"message": UNCHANGED_MESSAGE})
            );
        }
    }

    #[tokio::test]
    async fn test_update_product_empty_name_still_applies_other_fields() {
        let mut mock = MockProductRepository::new();
        mock.expect_update()
            .withf(|_, changes| changes.name.is_none() && changes.price == Some(9.5))
            .returning(|_, _| Ok(Some(widget())));

        let response = app(mock)
            .oneshot(json_request(
                "PUT",
                "/products/1",
                json!({"name": "", "price": 9.5}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"message": UPDATED_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_update_product_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_update().returning(|_, _| Ok(None));

        let response = app(mock)
            .oneshot(json_request("PUT", "/products/404", json!({"quantity": 0})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response.into_body()).await;
        assert_eq!(json["message"], crate::error::NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_update_product_invalid_id() {
        let mut mock = MockProductRepository::new();
        mock.expect_update().never();

        let response = app(mock)
            .oneshot(json_request("PUT", "/products/abc", json!({"price": 1})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_product_success_then_not_found() {
        let mut mock = MockProductRepository::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(widget())));
        mock.expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let app = app(mock);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/products/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"message": DELETED_MESSAGE})
        );

        let response = app
            .oneshot(empty_request("DELETE", "/products/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_inventory_report() {
        let mut mock = MockProductRepository::new();
        mock.expect_inventory_report().returning(|| {
            Ok(InventoryReport {
                total_quantity: 5,
                total_value: 40.0,
            })
        });

        let response = app(mock)
            .oneshot(empty_request("GET", "/inventory-report"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response.into_body()).await,
            json!({"totalQuantity": 5, "totalValue": 40.0})
        );
    }

    #[test]
    fn test_openapi_documents_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/products".to_string()));
        assert!(paths.contains(&"/products/{id}".to_string()));
        assert!(paths.contains(&"/inventory-report".to_string()));
    }
}
