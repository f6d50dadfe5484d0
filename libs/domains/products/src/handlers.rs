//! HTTP handlers for Products API

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse, ValidationFailedResponse,
    },
    ValidatedJson, REQUEST_ID_HEADER,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ProductResult;
use crate::filter::RawFilter;
use crate::models::{DeleteResponse, GeoJsonPoint, GeoJsonType, Product, ProductPage, ProductPayload};
use crate::pagination::PaginationMeta;
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, ProductPayload, ProductPage, PaginationMeta,
            GeoJsonPoint, GeoJsonType, DeleteResponse
        ),
        responses(
            BadRequestResponse,
            ValidationFailedResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Deadline applied to every request's [`RequestContext`].
///
/// Installed as a router extension; requests without it run unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map_or_else(|| Uuid::now_v7().to_string(), str::to_string);

        let ctx = RequestContext::new(request_id);
        Ok(match parts.extensions.get::<RequestTimeout>() {
            Some(RequestTimeout(timeout)) => ctx.with_timeout(*timeout),
            None => ctx,
        })
    }
}

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products, optionally near a point and/or matching a keyword
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(RawFilter),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ctx: RequestContext,
    Query(filter): Query<RawFilter>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(&ctx, filter).await?;
    Ok(Json(page))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationFailedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(&ctx, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(&ctx, &id).await?;
    Ok(Json(product))
}

/// Replace a product's name, price, location and description
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationFailedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(&ctx, &id, payload).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (UUID)")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = DeleteResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ProductResult<Json<DeleteResponse>> {
    service.delete_product(&ctx, &id).await?;
    Ok(Json(DeleteResponse::deleted()))
}
