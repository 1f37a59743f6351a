//! Application error type mapping to HTTP status codes and the error body.
//!
//! Every error response has the shape
//! `{"errors": [{"code": "...", "message": "..."}]}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use autonomax_types::error::{DraftError, PublishError, RepositoryError};
use autonomax_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Draft generation errors.
    Draft(DraftError),
    /// Publish queue errors.
    Publish(PublishError),
    /// Draft store errors.
    Repository(RepositoryError),
    /// No draft with this id.
    DraftNotFound(String),
    /// Malformed request body or path.
    Validation(String),
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        AppError::Draft(e)
    }
}

impl From<PublishError> for AppError {
    fn from(e: PublishError) -> Self {
        AppError::Publish(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Draft(DraftError::InvalidBrief(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Draft(e @ DraftError::UpstreamUnavailable(LlmError::Timeout(_))) => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_UNAVAILABLE", e.to_string())
            }
            AppError::Draft(e @ DraftError::UpstreamUnavailable(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", e.to_string())
            }
            AppError::Publish(e @ PublishError::UnsupportedChannel(_)) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_CHANNEL", e.to_string())
            }
            AppError::Publish(PublishError::QueueFull) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "QUEUE_FULL",
                "publish queue is full, try again later".to_string(),
            ),
            AppError::Publish(e @ PublishError::QueueClosed) => {
                (StatusCode::SERVICE_UNAVAILABLE, "QUEUE_CLOSED", e.to_string())
            }
            AppError::Publish(PublishError::TaskNotFound) => (
                StatusCode::NOT_FOUND,
                "TASK_NOT_FOUND",
                "Publish task not found".to_string(),
            ),
            AppError::Publish(e) => (StatusCode::BAD_GATEWAY, "PUBLISH_ERROR", e.to_string()),
            AppError::Repository(e @ RepositoryError::Query(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::DraftNotFound(id) => (
                StatusCode::NOT_FOUND,
                "DRAFT_NOT_FOUND",
                format!("Draft '{id}' not found"),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::warn!(%status, code, %message, "request failed");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_brief_is_bad_request() {
        let (status, code, _) = AppError::from(DraftError::InvalidBrief("category".into())).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn provider_failure_is_bad_gateway() {
        let err = DraftError::from(LlmError::Provider {
            message: "connection refused".into(),
        });
        let (status, code, message) = AppError::from(err).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_UNAVAILABLE");
        assert!(message.starts_with("generation failed, try again"));
    }

    #[test]
    fn provider_timeout_is_gateway_timeout() {
        let (status, code, _) = AppError::from(DraftError::from(LlmError::Timeout(30))).parts();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "UPSTREAM_UNAVAILABLE");
    }

    #[test]
    fn publish_errors_map_to_statuses() {
        let cases = [
            (PublishError::UnsupportedChannel("etsy".into()), StatusCode::BAD_REQUEST),
            (PublishError::QueueFull, StatusCode::SERVICE_UNAVAILABLE),
            (PublishError::TaskNotFound, StatusCode::NOT_FOUND),
            (
                PublishError::Unavailable("reset".into()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).parts().0, expected);
        }
    }

    #[test]
    fn storage_failure_is_internal_error() {
        let err = RepositoryError::Query("lock poisoned".into());
        let (status, code, _) = AppError::from(err).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
    }

    #[test]
    fn draft_not_found_code() {
        let (status, code, message) = AppError::DraftNotFound("draft-1".into()).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "DRAFT_NOT_FOUND");
        assert!(message.contains("draft-1"));
    }
}
