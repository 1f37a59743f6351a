//! Product draft and publish handlers for the REST API.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use autonomax_core::repository::draft::DraftRepository;
use autonomax_types::error::PublishError;
use autonomax_types::event::ProductEvent;
use autonomax_types::product::{ProductBrief, ProductDraft, PublishRequest};
use autonomax_types::publish::{PublishTask, PublishTicket, TaskId};

use crate::http::error::AppError;
use crate::state::AppState;

/// Response header set when the draft was synthesized from unstructured text.
pub const FALLBACK_HEADER: &str = "x-draft-fallback";

#[derive(Debug, Deserialize)]
pub struct DraftListQuery {
    pub limit: Option<usize>,
}

/// POST /v1/products/draft - Generate a draft from a brief.
pub async fn create_draft(
    State(state): State<AppState>,
    body: Result<Json<ProductBrief>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(brief) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let resolved = state.generator.generate_resolved(&brief).await?;
    let draft = resolved.draft;

    match state.drafts.save(&draft).await {
        Ok(Some(replaced)) => tracing::warn!(
            draft_id = %draft.id,
            replaced_title = %replaced.title,
            "draft id reused, earlier draft replaced"
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!(draft_id = %draft.id, error = %e, "failed to record draft"),
    }

    state.events.emit(ProductEvent::DraftGenerated {
        draft_id: draft.id.clone(),
        score: draft.score,
        fallback: resolved.fallback,
    });

    let mut response = Json(draft).into_response();
    if resolved.fallback {
        response
            .headers_mut()
            .insert(FALLBACK_HEADER, axum::http::HeaderValue::from_static("true"));
    }
    Ok(response)
}

/// GET /v1/products - Recorded drafts, newest first.
pub async fn list_drafts(
    State(state): State<AppState>,
    Query(query): Query<DraftListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let products = state.drafts.list(query.limit).await?;
    Ok(Json(serde_json::json!({ "products": products })))
}

/// GET /v1/products/{id} - A single recorded draft.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDraft>, AppError> {
    state
        .drafts
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::DraftNotFound(id))
}

/// POST /v1/products/publish - Queue a draft for publishing.
///
/// Returns 202 with the ticket as soon as the task is queued.
pub async fn publish_draft(
    State(state): State<AppState>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublishTicket>), AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    if request.pricing.is_some() {
        tracing::debug!(draft_id = %request.draft_id, "pricing override ignored");
    }

    let ticket = state
        .publish_queue
        .enqueue(&request.channel, &request.draft_id)?;

    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

/// GET /v1/products/publish/{task_id} - Publish task status.
pub async fn get_publish_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<PublishTask>, AppError> {
    let task_id: TaskId = task_id
        .parse()
        .map_err(|_| AppError::Publish(PublishError::TaskNotFound))?;

    state
        .publish_queue
        .get(&task_id)
        .map(Json)
        .ok_or(AppError::Publish(PublishError::TaskNotFound))
}

/// GET /v1/products/publish/dead-letters - Tasks that exhausted their retries.
pub async fn list_dead_letters(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "tasks": state.publish_queue.dead_letters() }))
}
