//! Event bus using tokio broadcast channel
//!
//! Fans retrieval events out to any number of subscribers. Slow subscribers
//! miss events rather than stalling the retrieval that emits them.

use tokio::sync::broadcast;

use super::event::RetrievalEvent;
use super::observer::RetrievalObserver;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast bus for retrieval events.
///
/// Install it as the retriever's observer, then `subscribe` from anywhere.
/// With no subscribers, events are dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RetrievalEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Emit an event to all subscribers. Never blocks or fails.
    pub fn emit(&self, event: RetrievalEvent) {
        let _ = self.sender.send(event);
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RetrievalObserver for EventBus {
    fn observe(&self, event: &RetrievalEvent) {
        if self.sender.receiver_count() > 0 {
            self.emit(event.clone());
        }
    }
}

/// Subscriber to event bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<RetrievalEvent>,
}

impl EventSubscriber {
    /// Receive the next event, or `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<RetrievalEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event subscriber lagged by {} events", n);
                    continue;
                }
            }
        }
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Option<RetrievalEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain every event currently buffered.
    pub fn drain(&mut self) -> Vec<RetrievalEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
