//! Broadcast event bus for distributing `ProductEvent` to multiple subscribers.
//!
//! Built on `tokio::sync::broadcast`, the `EventBus` supports multiple
//! concurrent subscribers. Publishing with no active subscribers still
//! writes the log line; the broadcast itself is a no-op.

use autonomax_types::event::ProductEvent;
use tokio::sync::broadcast;

/// Multi-consumer event bus for product events.
///
/// Wraps a `tokio::sync::broadcast` channel. Cloning the bus clones the
/// sender, allowing multiple producers and consumers.
pub struct EventBus {
    sender: broadcast::Sender<ProductEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProductEvent> {
        self.sender.subscribe()
    }

    /// Log the event under its dotted name and broadcast it.
    pub fn emit(&self, event: ProductEvent) {
        match &event {
            ProductEvent::DraftGenerated {
                draft_id,
                score,
                fallback,
            } => tracing::info!(event = event.name(), %draft_id, score, fallback),
            ProductEvent::PublishQueued {
                task_id,
                draft_id,
                channel,
            } => tracing::info!(event = event.name(), %task_id, %draft_id, %channel),
            ProductEvent::PublishRetrying {
                task_id,
                attempt,
                error,
            } => tracing::warn!(event = event.name(), %task_id, attempt, %error),
            ProductEvent::PublishSucceeded {
                task_id,
                product_id,
            } => tracing::info!(event = event.name(), %task_id, %product_id),
            ProductEvent::PublishFailed {
                task_id,
                error,
                dead_lettered,
            } => tracing::error!(event = event.name(), %task_id, %error, dead_lettered),
        }
        let _ = self.sender.send(event);
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ProductEvent {
        ProductEvent::DraftGenerated {
            draft_id: "draft-1".to_string(),
            score: 4.0,
            fallback: false,
        }
    }

    #[tokio::test]
    async fn emit_and_subscribe_delivers_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(sample_event());

        let received = rx.recv().await.unwrap();
        assert!(matches!(
            received,
            ProductEvent::DraftGenerated { ref draft_id, .. } if draft_id == "draft-1"
        ));
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(sample_event());

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn emit_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.emit(sample_event());
        bus.emit(sample_event());
    }

    #[test]
    fn clone_shares_channel() {
        let bus = EventBus::new(16);
        let bus2 = bus.clone();
        let mut rx = bus.subscribe();

        bus2.emit(sample_event());

        assert!(rx.try_recv().is_ok());
    }
}
