//! Axum router configuration with middleware.
//!
//! Product routes live under `/v1/products`; probes sit at the root.
//! Middleware: CORS (origins from settings), request tracing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.api.cors_origins);

    let product_routes = Router::new()
        .route("/", get(handlers::product::list_drafts))
        .route("/draft", post(handlers::product::create_draft))
        .route("/publish", post(handlers::product::publish_draft))
        .route(
            "/publish/dead-letters",
            get(handlers::product::list_dead_letters),
        )
        .route(
            "/publish/{task_id}",
            get(handlers::product::get_publish_task),
        )
        .route("/{id}", get(handlers::product::get_draft));

    Router::new()
        .nest("/v1/products", product_routes)
        .route("/health", get(handlers::system::health))
        .route("/ready", get(handlers::system::ready))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow the configured origins; `*` allows any.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
