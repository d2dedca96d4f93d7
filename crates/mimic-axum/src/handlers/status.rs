//! Status handlers: health, readiness, version, metadata and status echo.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use mimic_core::{HostMetadata, resolve_version};

use crate::dto::{HealthResponse, MetadataResponse, ReadinessResponse, VersionResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// `GET /health`: 200 when healthy, 500 otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let healthy = state.status.is_healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(HealthResponse { healthy })).into_response()
}

/// `GET /readiness`: 200 when ready, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> Response {
    let ready = state.status.is_ready();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ready })).into_response()
}

/// `GET /version` (gated).
pub async fn version(State(state): State<AppState>) -> Result<Json<VersionResponse>, HttpError> {
    state.status.ensure_available()?;
    Ok(Json(VersionResponse {
        version: resolve_version(state.version_override.as_deref()),
    }))
}

/// `GET /meta` (gated).
pub async fn meta(State(state): State<AppState>) -> Result<Json<MetadataResponse>, HttpError> {
    state.status.ensure_available()?;
    let meta = HostMetadata::detect().await?;
    Ok(Json(meta.into()))
}

#[derive(Debug, Deserialize)]
pub struct ReturnParams {
    delay: Option<String>,
}

/// `GET /return/{status_code}?delay=<ms>`: reply with exactly that status.
pub async fn return_status(
    Path(status_code): Path<String>,
    Query(params): Query<ReturnParams>,
) -> Result<StatusCode, HttpError> {
    let code: i64 = status_code.parse().map_err(|e| {
        HttpError::BadRequest(format!("error converting the statusCode to int: {e}"))
    })?;
    let status = u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or_else(|| HttpError::BadRequest(format!("invalid status code: {code}")))?;

    if let Some(delay) = params.delay.as_deref().filter(|d| !d.is_empty()) {
        let millis: i64 = delay.parse().map_err(|e| {
            HttpError::BadRequest(format!("error converting the delay to int: {e}"))
        })?;
        // Negative delays do not wait.
        let millis = u64::try_from(millis).unwrap_or(0);
        debug!(status = status.as_u16(), delay_ms = millis, "Delaying echoed status");
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    Ok(status)
}
