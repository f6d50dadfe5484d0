//! HTTP-level tests for the products router

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use domain_products::{handlers, DeleteResponse, InMemoryProductRepository, Product, ProductPage, ProductService};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, body: Value) -> Product {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn create_returns_201_and_product_is_fetchable() {
    let app = app();
    let created = create(
        &app,
        json!({
            "name": "Chair",
            "price": 100.0,
            "location": { "type": "Point", "coordinates": [106.8, -6.2] }
        }),
    )
    .await;
    assert_eq!(created.name, "Chair");
    assert!(created.location.is_some());

    let response = app
        .oneshot(empty_request(Method::GET, &format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Product = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_payload_is_422_with_field_details() {
    let response = app()
        .oneshot(json_request(Method::POST, "/", json!({ "name": "", "price": -5.0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["price"].is_array());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_id_is_400() {
    let response = app()
        .oneshot(empty_request(Method::GET, "/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(response).await;
    assert_eq!(body["error"], "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn missing_product_is_404() {
    let id = uuid::Uuid::now_v7();
    for method in [Method::GET, Method::DELETE] {
        let response = app()
            .oneshot(empty_request(method, &format!("/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app()
        .oneshot(json_request(
            Method::PUT,
            &format!("/{id}"),
            json!({ "name": "Ghost", "price": 1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_range_latitude_is_400() {
    let response = app()
        .oneshot(empty_request(Method::GET, "/?latitude=-95&longitude=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(response).await;
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn list_wraps_items_in_data_and_pagination() {
    let app = app();
    create(&app, json!({ "name": "Oak Desk", "price": 300.0 })).await;
    create(&app, json!({ "name": "Chair", "price": 80.0 })).await;

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/?keyword=DESK&limit=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let raw: Value = body_json(response).await;
    assert!(raw["data"].is_array());
    assert_eq!(raw["pagination"]["limit"], 5);

    let page: ProductPage = serde_json::from_value(raw).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Oak Desk");
    assert_eq!(page.pagination.total_items, 1);
}

#[tokio::test]
async fn update_then_delete() {
    let app = app();
    let created = create(&app, json!({ "name": "Chair", "price": 100.0 })).await;
    let uri = format!("/{}", created.id);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &uri,
            json!({ "name": "Armchair", "price": 150.0, "description": "padded" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = body_json(response).await;
    assert_eq!(updated.name, "Armchair");
    assert_eq!(updated.description.as_deref(), Some("padded"));
    assert_eq!(updated.created_at, created.created_at);

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted: DeleteResponse = body_json(response).await;
    assert_eq!(deleted.message, "Deleted successfully");

    let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
