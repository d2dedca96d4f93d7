//! HTTP request handlers for the Axum web server.
//!
//! Each submodule covers one API area. Handlers are thin wrappers that
//! delegate to the core services held in [`crate::state::AppState`].

pub mod call;
pub mod control;
pub mod proxy;
pub mod status;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mimic_core::Reply;

use crate::headers::apply_pairs;

/// Convert a relayed [`Reply`] into an HTTP response.
pub(crate) fn reply_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = match reply.body {
        None => status.into_response(),
        Some(body) => (status, Json(body)).into_response(),
    };
    apply_pairs(response.headers_mut(), reply.headers);
    response
}
