//! Request handlers for the plan API.

use crate::{
    models::Plan,
    services::{ReadOutcome, UpdateOutcome},
    state::AppState,
    Error, Result,
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use planvault_schema::ValidationIssue;
use serde_json::{json, Value as JsonValue};

/// POST /v1/plan
pub async fn create_plan(
    State(state): State<AppState>,
    Json(body): Json<JsonValue>,
) -> Result<Response> {
    let plan: Plan = from_body(body, "")?;
    let object_id = plan.object_id.clone();

    let outcome = state.orchestrator.create(plan).await?;

    Ok((
        StatusCode::CREATED,
        etag_header(&outcome.token)?,
        Json(json!({ "message": "plan created", "objectId": object_id })),
    )
        .into_response())
}

/// GET /v1/plan/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let cache_token = header_value(&headers, header::IF_NONE_MATCH);

    match state.orchestrator.read(&id, cache_token).await? {
        ReadOutcome::NotModified { token } => {
            Ok((StatusCode::NOT_MODIFIED, etag_header(&token)?).into_response())
        }
        ReadOutcome::Found { plan, token } => {
            Ok((StatusCode::OK, etag_header(&token)?, Json(plan)).into_response())
        }
    }
}

/// PATCH /v1/plan/{id}
///
/// Body: `{ "linkedPlanServices": [ ... ] }`. Strictly additive; entries whose
/// `objectId` already exists are ignored, and an update that adds nothing is
/// the distinct no-op outcome (200 with `"added": 0`, token unchanged).
///
/// The body is handed through raw: existence and precondition checks come
/// before any shape validation.
pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> Result<Response> {
    let supplied_token = header_value(&headers, header::IF_MATCH);

    match state.orchestrator.update(&id, supplied_token, body).await?
    {
        UpdateOutcome::NoOp { token } => Ok((
            StatusCode::OK,
            etag_header(&token)?,
            Json(json!({
                "message": "no new linked services; nothing to update",
                "added": 0,
            })),
        )
            .into_response()),
        UpdateOutcome::Updated { plan, token } => {
            Ok((StatusCode::OK, etag_header(&token)?, Json(plan)).into_response())
        }
    }
}

/// DELETE /v1/plan/{id}
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let supplied_token = header_value(&headers, header::IF_MATCH);

    let outcome = state.orchestrator.delete(&id, supplied_token).await?;

    if outcome.projection_cleaned {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        // Primary deletion is final; report the pending index cleanup.
        Ok((
            StatusCode::OK,
            Json(json!({
                "message": "plan deleted; search index cleanup pending",
            })),
        )
            .into_response())
    }
}

/// GET /health
pub async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn etag_header(token: &str) -> Result<[(header::HeaderName, HeaderValue); 1]> {
    let value = HeaderValue::from_str(token)
        .map_err(|e| Error::Internal(format!("token is not a valid header value: {e}")))?;
    Ok([(header::ETAG, value)])
}

/// Deserialize a request-body value, reporting shape problems as validation
/// issues instead of a bare deserializer message.
fn from_body<T: serde::de::DeserializeOwned>(body: JsonValue, path: &str) -> Result<T> {
    serde_json::from_value(body).map_err(|e| {
        Error::Validation(vec![ValidationIssue {
            path: path.to_string(),
            message: e.to_string(),
        }])
    })
}

