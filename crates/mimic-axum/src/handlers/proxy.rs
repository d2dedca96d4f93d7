//! Proxy handlers: route table CRUD and the catch-all forwarder.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use mimic_core::{ProxyRoute, forwarded_headers};

use super::reply_response;
use crate::dto::DeleteResult;
use crate::error::HttpError;
use crate::headers::utf8_pairs;
use crate::state::AppState;

/// Identifies a route for deletion; any `proxy` field is ignored.
#[derive(Debug, Deserialize)]
struct RouteKey {
    path: String,
    method: String,
}

fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, HttpError> {
    serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("error when decoding request: {e}")))
}

/// `POST /proxy`: 201 on success, 400 on duplicates or bad input.
pub async fn add(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, HttpError> {
    let route: ProxyRoute = decode(&body)?;
    state.proxies.add(route)?;
    Ok(StatusCode::CREATED)
}

/// `DELETE /proxy`: 200 on success, 404 when the route is unknown.
pub async fn remove(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeleteResult>, HttpError> {
    let key: RouteKey = decode(&body)?;
    state.proxies.remove(&key.path, &key.method)?;
    Ok(Json(DeleteResult {
        result: "deleted the proxy config successfully".to_string(),
    }))
}

/// Catch-all: forward unmatched requests to a configured proxy target.
pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let path = uri.path();
    let Some(target) = state.proxies.resolve(path, method.as_str()) else {
        debug!(path = %path, method = %method, "No proxy route matched");
        return Err(HttpError::NotFound(format!(
            "no proxy configured for path {path} and method {method}"
        )));
    };

    let headers = forwarded_headers(utf8_pairs(&headers));
    let reply = state.relay.forward(&target, headers).await?;
    Ok(reply_response(reply))
}
