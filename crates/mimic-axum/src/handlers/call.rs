//! `POST /call`: relay an arbitrary request and translate its response.

use axum::extract::State;
use axum::response::Response;
use bytes::Bytes;
use tracing::info;

use mimic_core::CallRequest;

use super::reply_response;
use crate::error::HttpError;
use crate::state::AppState;

pub async fn call(State(state): State<AppState>, body: Bytes) -> Result<Response, HttpError> {
    let request = CallRequest::from_json(&body)?;
    info!(method = %request.method, url = %request.url, "Calling upstream");

    let reply = state.relay.call(&request).await?;
    Ok(reply_response(reply))
}
