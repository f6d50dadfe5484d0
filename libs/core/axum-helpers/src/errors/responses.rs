//! Reusable OpenAPI response definitions.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Malformed identifier or query parameters",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "INVALID_QUERY",
        "message": "latitude must be between -90 and 90",
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Request body failed validation",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "name": [{
                "code": "length",
                "message": "name must be between 1 and 200 characters",
                "params": {"min": 1, "max": 200, "value": ""}
            }]
        }
    })
)]
pub struct ValidationFailedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "NOT_FOUND",
        "message": "Resource not found",
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 5002,
        "error": "PERSISTENCE_ERROR",
        "message": "The storage backend failed to complete the request",
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Request cancelled or timed out",
    content_type = "application/json",
    example = json!({
        "code": 5004,
        "error": "REQUEST_CANCELLED",
        "message": "list_products was cancelled before completing",
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
