//! Agent event system — the observability boundary the runtime emits to.
//!
//! The agent loop publishes events instead of printing; subscribers (the
//! CLI, tests, future dashboards) decide what to do with them. Publishing
//! with no subscribers is a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::gateway::Usage;

/// All events emitted by the agent runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A `run` invocation began
    RunStarted {
        agent: String,
        timestamp: DateTime<Utc>,
    },

    /// The model backend returned a response
    ResponseGenerated {
        agent: String,
        backend: String,
        usage: Option<Usage>,
        timestamp: DateTime<Utc>,
    },

    /// A tool was dispatched
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A `run` invocation finished with a final answer
    RunCompleted {
        agent: String,
        iterations: usize,
        timestamp: DateTime<Utc>,
    },

    /// A `run` invocation aborted (gateway failure or iteration limit)
    RunFailed {
        agent: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for agent events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Components
/// subscribe to receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<AgentEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: AgentEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AgentEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
