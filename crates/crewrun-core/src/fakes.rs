//! In-memory fakes for testing.
//!
//! Provides a `MemorySink` that satisfies the [`EventSink`] contract without
//! any logging backend.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::events::{EventSink, RunEvent};

/// In-memory event sink backed by a `Mutex<Vec<RunEvent>>`.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RunEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, in publish order.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events belonging to one agent, in publish order.
    pub fn events_for(&self, name: &str) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.agent_name() == name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn publish(&self, event: RunEvent) {
        self.events.lock().unwrap().push(event);
    }
}
