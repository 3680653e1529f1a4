//! Retrieval events.
//!
//! This module provides:
//! - Event types describing each retrieval step
//! - The observer trait the retriever reports to
//! - An event bus for in-process pub/sub of those events

mod bus;
mod event;
mod observer;

pub use bus::{EventBus, EventSubscriber};
pub use event::RetrievalEvent;
pub use observer::{NoopObserver, RetrievalObserver, TracingObserver};
