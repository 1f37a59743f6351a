//! Liveness and readiness probes.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /health - Liveness probe reporting the deployment environment.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "env": state.settings.app_env,
    }))
}

/// GET /ready - Readiness probe.
pub async fn ready() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}
