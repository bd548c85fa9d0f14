use axum::Router;

use wagerwatch_application::AppState;

use crate::handlers::{detect_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v2/detect/report",
            axum::routing::get(detect_handlers::get_report),
        )
        .route(
            "/v2/detect/run",
            axum::routing::post(detect_handlers::trigger_run),
        )
        .route(
            "/v2/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v2/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
