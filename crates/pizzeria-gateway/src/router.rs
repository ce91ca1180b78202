//! Axum router wiring.
//!
//! `/v1/ws` upgrades to a WebSocket session; `/metrics` renders in-process
//! metrics as Prometheus text.

use axum::{extract::State, http::header, response::IntoResponse, routing::get, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn metrics(State(app): State<AppState>) -> impl IntoResponse {
    let body = app.metrics().render();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
