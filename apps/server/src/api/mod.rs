//! HTTP API: routes, handlers, and the error-to-response mapping.

pub mod handlers;
pub mod routes;

pub use routes::create_router;

use crate::Error;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Each error variant maps to one stable response category, so callers can
/// tell "retry with fresh state" from "do not retry" from "infrastructure".
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "schema validation failed",
                    "errors": issues,
                })),
            )
                .into_response(),
            Error::Conflict(id) => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": format!("a plan with objectId '{id}' already exists"),
                })),
            )
                .into_response(),
            Error::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "no plan found for the provided id" })),
            )
                .into_response(),
            Error::PreconditionRequired => (
                StatusCode::PRECONDITION_REQUIRED,
                Json(json!({ "message": "If-Match header is required" })),
            )
                .into_response(),
            Error::PreconditionFailed { current_token } => {
                let mut response = (
                    StatusCode::PRECONDITION_FAILED,
                    Json(json!({ "message": "supplied token does not match current content" })),
                )
                    .into_response();
                if let Ok(value) = HeaderValue::from_str(&current_token) {
                    response.headers_mut().insert(header::ETAG, value);
                }
                response
            }
            Error::ProjectionFailed(_) => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "failed to project plan into the search index" })),
                )
                    .into_response()
            }
            Error::StoreUnavailable(_) => {
                tracing::error!("{self}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "message": "primary store unavailable, retry later" })),
                )
                    .into_response()
            }
            Error::Internal(_) => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
