//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::bootstrap::AxumContext;
use crate::handlers;
use crate::state::AppState;

/// Control routes. These are never gated on health or readiness.
fn control_routes() -> Router<AppState> {
    Router::new()
        .route("/control/health/perfect", put(handlers::control::health_perfect))
        .route("/control/health/sick", put(handlers::control::health_sick))
        .route("/control/ready/perfect", put(handlers::control::ready_perfect))
        .route("/control/ready/sick", put(handlers::control::ready_sick))
        .route("/control/crash", put(handlers::control::crash))
        .route("/control/goturbo/memory", put(handlers::control::turbo_memory))
        .route("/control/goturbo/cpu", put(handlers::control::turbo_cpu))
}

/// Create the main router.
///
/// Anything that matches no route (including a known path with another
/// method) is handed to the proxy forwarder.
pub fn create_router(ctx: AxumContext) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(handlers::status::health))
        .route("/readiness", get(handlers::status::readiness))
        .route("/version", get(handlers::status::version))
        .route("/meta", get(handlers::status::meta))
        .route("/return/{status_code}", get(handlers::status::return_status))
        .route("/call", post(handlers::call::call))
        .route(
            "/proxy",
            post(handlers::proxy::add).delete(handlers::proxy::remove),
        )
        .merge(control_routes())
        .method_not_allowed_fallback(handlers::proxy::forward)
        .fallback(handlers::proxy::forward)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
