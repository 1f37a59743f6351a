//! Publish task types: channels, task status, and the records the publish
//! queue keeps for each task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::PublishError;

/// Unique identifier for a publish task, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Commerce destinations a draft can be published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishChannel {
    Shopify,
}

impl fmt::Display for PublishChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishChannel::Shopify => write!(f, "shopify"),
        }
    }
}

impl FromStr for PublishChannel {
    type Err = PublishError;

    /// Channel names are matched exactly; `"Shopify"` is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(PublishChannel::Shopify),
            other => Err(PublishError::UnsupportedChannel(other.to_string())),
        }
    }
}

/// Lifecycle of a publish task.
///
/// `Queued -> Running -> Published`, with `Running -> Retrying -> Running`
/// loops while the retry budget lasts, ending in `Failed` (non-retryable
/// error) or `DeadLettered` (budget exhausted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Queued,
    Running,
    Retrying,
    Published,
    Failed,
    DeadLettered,
}

impl PublishStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PublishStatus::Published | PublishStatus::Failed | PublishStatus::DeadLettered
        )
    }

    /// Whether a new request for the same draft and channel should reuse
    /// this task instead of enqueuing another one.
    pub fn blocks_duplicate(&self) -> bool {
        !matches!(self, PublishStatus::Failed | PublishStatus::DeadLettered)
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStatus::Queued => write!(f, "queued"),
            PublishStatus::Running => write!(f, "running"),
            PublishStatus::Retrying => write!(f, "retrying"),
            PublishStatus::Published => write!(f, "published"),
            PublishStatus::Failed => write!(f, "failed"),
            PublishStatus::DeadLettered => write!(f, "dead_lettered"),
        }
    }
}

/// Everything the queue knows about one publish task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishTask {
    pub task_id: TaskId,
    pub channel: PublishChannel,
    pub draft_id: String,
    pub status: PublishStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublishTask {
    pub fn new(channel: PublishChannel, draft_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id: TaskId::new(),
            channel,
            draft_id: draft_id.into(),
            status: PublishStatus::Queued,
            attempts: 0,
            product_id: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Acknowledgement returned when a publish request is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishTicket {
    pub status: PublishStatus,
    pub task_id: TaskId,
}

/// What a channel reports after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub product_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parse_is_exact() {
        assert_eq!("shopify".parse::<PublishChannel>().unwrap(), PublishChannel::Shopify);
        assert!(matches!(
            "Shopify".parse::<PublishChannel>(),
            Err(PublishError::UnsupportedChannel(_))
        ));
        assert!("etsy".parse::<PublishChannel>().is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!PublishStatus::Queued.is_terminal());
        assert!(!PublishStatus::Retrying.is_terminal());
        assert!(PublishStatus::Published.is_terminal());
        assert!(PublishStatus::DeadLettered.is_terminal());
    }

    #[test]
    fn test_status_blocks_duplicate() {
        assert!(PublishStatus::Queued.blocks_duplicate());
        assert!(PublishStatus::Published.blocks_duplicate());
        assert!(!PublishStatus::Failed.blocks_duplicate());
        assert!(!PublishStatus::DeadLettered.blocks_duplicate());
    }

    #[test]
    fn test_ticket_serializes_queued() {
        let task = PublishTask::new(PublishChannel::Shopify, "demo-1");
        let ticket = PublishTicket {
            status: task.status.clone(),
            task_id: task.task_id,
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["status"], "queued");
        assert_eq!(json["task_id"], task.task_id.to_string());
    }

    #[test]
    fn test_task_id_roundtrip() {
        let id = TaskId::new();
        let parsed: TaskId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
