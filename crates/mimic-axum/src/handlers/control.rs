//! Control handlers: flip health/readiness and inject faults.
//!
//! None of these are gated, so an unhealthy instance can still be recovered.

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use mimic_core::StatusFlag;

use crate::dto::ControlSuccess;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ResetParams {
    #[serde(rename = "resetInSeconds")]
    reset_in_seconds: Option<String>,
}

impl ResetParams {
    /// Positive whole seconds; anything else means "no reset".
    fn reset_after(&self) -> Option<Duration> {
        self.reset_in_seconds
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub async fn health_perfect(State(state): State<AppState>) -> Json<ControlSuccess> {
    state.status.set_healthy(true);
    Json(ControlSuccess::success())
}

pub async fn health_sick(
    State(state): State<AppState>,
    Query(params): Query<ResetParams>,
) -> Json<ControlSuccess> {
    state
        .status
        .degrade(StatusFlag::Health, params.reset_after());
    Json(ControlSuccess::success())
}

pub async fn ready_perfect(State(state): State<AppState>) -> Json<ControlSuccess> {
    state.status.set_ready(true);
    Json(ControlSuccess::success())
}

pub async fn ready_sick(
    State(state): State<AppState>,
    Query(params): Query<ResetParams>,
) -> Json<ControlSuccess> {
    state.status.degrade(StatusFlag::Ready, params.reset_after());
    Json(ControlSuccess::success())
}

/// `PUT /control/crash`
pub async fn crash(State(state): State<AppState>) -> Json<ControlSuccess> {
    state.faults.crash();
    Json(ControlSuccess::success())
}

/// `PUT /control/goturbo/memory`
pub async fn turbo_memory(State(state): State<AppState>) -> Json<ControlSuccess> {
    state.faults.spike_memory();
    Json(ControlSuccess::success())
}

/// `PUT /control/goturbo/cpu`
pub async fn turbo_cpu(State(state): State<AppState>) -> Json<ControlSuccess> {
    state.faults.spike_cpu();
    Json(ControlSuccess::success())
}
