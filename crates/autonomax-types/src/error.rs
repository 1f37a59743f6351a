use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to draft generation.
///
/// A malformed provider response is not an error: it is absorbed into a
/// fallback draft. Only a provider call that does not complete surfaces.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid brief: {0}")]
    InvalidBrief(String),

    #[error("generation failed, try again: {0}")]
    UpstreamUnavailable(#[from] LlmError),
}

/// Errors related to publishing drafts to a commerce channel.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("unsupported channel '{0}' (only 'shopify' is wired)")]
    UnsupportedChannel(String),

    #[error("missing channel credentials: {0}")]
    MissingCredentials(String),

    #[error("channel rejected the product (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("channel temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected channel response: {0}")]
    InvalidResponse(String),

    #[error("publish queue is full")]
    QueueFull,

    #[error("publish queue is closed")]
    QueueClosed,

    #[error("publish task not found")]
    TaskNotFound,
}

impl PublishError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, HTTP 429 and 5xx are retryable; credential
    /// problems and other 4xx responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Unavailable(_) => true,
            PublishError::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from repository operations (used by trait definitions in autonomax-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}
