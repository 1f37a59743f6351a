//! Event types for the AutonomaX product event bus.
//!
//! `ProductEvent` is broadcast whenever a draft is generated or a publish
//! task changes state. All variants are Clone + Send + Sync for use with
//! tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::publish::{PublishChannel, TaskId};

/// Events emitted by draft generation and publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    /// A draft was generated and handed back to the caller.
    DraftGenerated {
        draft_id: String,
        score: f64,
        /// True when the provider output could not be parsed and the
        /// draft was synthesized from the raw text.
        fallback: bool,
    },

    /// A publish task was accepted onto the queue.
    PublishQueued {
        task_id: TaskId,
        draft_id: String,
        channel: PublishChannel,
    },

    /// An attempt failed with a retryable error; another will follow.
    PublishRetrying {
        task_id: TaskId,
        attempt: u32,
        error: String,
    },

    /// The channel accepted the product.
    PublishSucceeded { task_id: TaskId, product_id: String },

    /// The task ended without publishing.
    PublishFailed {
        task_id: TaskId,
        error: String,
        dead_lettered: bool,
    },
}

impl ProductEvent {
    /// Dotted event name used in structured logs (e.g. `product.generated`).
    pub fn name(&self) -> &'static str {
        match self {
            ProductEvent::DraftGenerated { .. } => "product.generated",
            ProductEvent::PublishQueued { .. } => "product.publish.queued",
            ProductEvent::PublishRetrying { .. } => "product.publish.retrying",
            ProductEvent::PublishSucceeded { .. } => "product.publish.succeeded",
            ProductEvent::PublishFailed { .. } => "product.publish.failed",
        }
    }
}
