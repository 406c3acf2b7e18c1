//! A gateway handle that carries conversation memory.
//!
//! [`AugmentedGateway`] pairs a backend with a [`ConversationMemory`] and
//! prefixes each request with a short window of prior turns, so the model
//! keeps context across `run` invocations without the backend knowing
//! anything about memory.

use std::sync::Arc;

use cogwork_core::error::{Error, GatewayError};
use cogwork_core::gateway::{Gateway, GatewayResponse};
use cogwork_core::memory::ConversationMemory;
use cogwork_core::tool::ToolDescriptor;
use cogwork_core::turn::Turn;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Number of prior turns woven into each outgoing prompt.
const CONTEXT_TURNS: usize = 5;

/// A model gateway handle augmented with bounded conversation memory.
pub struct AugmentedGateway {
    backend: Arc<dyn Gateway>,
    memory: ConversationMemory,
}

impl AugmentedGateway {
    /// Wrap a backend with a fresh memory at the default cap.
    pub fn new(backend: Arc<dyn Gateway>) -> Self {
        Self {
            backend,
            memory: ConversationMemory::new(),
        }
    }

    /// Set the memory cap.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.memory = ConversationMemory::with_max_turns(max_turns);
        self
    }

    /// The backend's identifier, for diagnostics.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Generate a response, weaving recent memory into the prompt.
    ///
    /// Routes to `generate_with_tools` when `tools` is non-empty and to the
    /// bare `generate` otherwise.
    pub async fn generate_response(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        let contextual = self.build_contextual_prompt(prompt);
        debug!(
            backend = self.backend.name(),
            tools = tools.len(),
            "Sending prompt to backend"
        );

        if tools.is_empty() {
            self.backend.generate(&contextual).await
        } else {
            self.backend.generate_with_tools(&contextual, tools).await
        }
    }

    /// Generate a value conforming to `schema` and deserialize it.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<T, Error> {
        let contextual = self.build_contextual_prompt(prompt);
        let value = self.backend.generate_structured(&contextual, schema).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Append a turn to memory, evicting the oldest past the cap.
    pub fn remember(&mut self, turn: Turn) {
        self.memory.append(turn);
    }

    /// The last `count` remembered turns, oldest first.
    pub fn recent(&self, count: usize) -> Vec<&Turn> {
        self.memory.recent(count)
    }

    /// Read access to the full memory.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Prefix the prompt with the last few turns, when there are any.
    fn build_contextual_prompt(&self, prompt: &str) -> String {
        if self.memory.is_empty() {
            return prompt.to_string();
        }

        let context = self
            .memory
            .recent(CONTEXT_TURNS)
            .iter()
            .map(|turn| turn.render())
            .collect::<Vec<_>>()
            .join("\n");

        format!("Previous context:\n{context}\n\nCurrent request: {prompt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_text_response, SequentialMockGateway};
    use serde::Deserialize;

    #[tokio::test]
    async fn bare_prompt_passes_through_when_memory_empty() {
        let backend = Arc::new(SequentialMockGateway::new(vec![make_text_response("hi")]));
        let gateway = AugmentedGateway::new(backend.clone());

        let response = gateway.generate_response("Hello", &[]).await.unwrap();
        assert_eq!(response.content, "hi");
        assert_eq!(backend.prompts()[0], "Hello");
    }

    #[tokio::test]
    async fn remembered_turns_prefix_the_prompt() {
        let backend = Arc::new(SequentialMockGateway::new(vec![make_text_response("ok")]));
        let mut gateway = AugmentedGateway::new(backend.clone());
        gateway.remember(Turn::user("What's the capital of France?"));
        gateway.remember(Turn::assistant("Paris."));

        gateway.generate_response("And of Italy?", &[]).await.unwrap();

        let prompt = &backend.prompts()[0];
        assert!(prompt.starts_with("Previous context:\n"));
        assert!(prompt.contains("user: What's the capital of France?"));
        assert!(prompt.contains("assistant: Paris."));
        assert!(prompt.ends_with("Current request: And of Italy?"));
    }

    #[tokio::test]
    async fn context_window_keeps_only_recent_turns() {
        let backend = Arc::new(SequentialMockGateway::new(vec![make_text_response("ok")]));
        let mut gateway = AugmentedGateway::new(backend.clone());
        for i in 0..8 {
            gateway.remember(Turn::user(format!("message {i}")));
        }

        gateway.generate_response("next", &[]).await.unwrap();

        let prompt = &backend.prompts()[0];
        assert!(!prompt.contains("message 2"));
        assert!(prompt.contains("message 3"));
        assert!(prompt.contains("message 7"));
    }

    #[tokio::test]
    async fn tools_route_to_generate_with_tools() {
        let backend = Arc::new(SequentialMockGateway::new(vec![make_text_response("ok")]));
        let gateway = AugmentedGateway::new(backend.clone());
        let tools = vec![ToolDescriptor {
            name: "echo".into(),
            description: "Echo input".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];

        gateway.generate_response("go", &tools).await.unwrap();
        assert_eq!(backend.tool_counts(), vec![1]);
    }

    #[tokio::test]
    async fn memory_cap_applies_through_the_handle() {
        let backend = Arc::new(SequentialMockGateway::new(vec![]));
        let mut gateway = AugmentedGateway::new(backend).with_max_turns(3);
        for i in 0..5 {
            gateway.remember(Turn::user(format!("turn {i}")));
        }

        assert_eq!(gateway.memory_len(), 3);
        assert_eq!(gateway.memory().recent(1)[0].content, "turn 4");
    }

    #[tokio::test]
    async fn structured_output_deserializes() {
        #[derive(Deserialize)]
        struct Answer {
            result: String,
        }

        let backend = Arc::new(SequentialMockGateway::new(vec![]));
        let gateway = AugmentedGateway::new(backend);
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"result": {"type": "string"}}
        });

        let answer: Answer = gateway.generate_structured("summarize", &schema).await.unwrap();
        assert_eq!(answer.result, "structured");
    }

    #[tokio::test]
    async fn clear_memory_empties_the_log() {
        let backend = Arc::new(SequentialMockGateway::new(vec![]));
        let mut gateway = AugmentedGateway::new(backend);
        gateway.remember(Turn::user("hello"));
        assert_eq!(gateway.memory_len(), 1);

        gateway.clear_memory();
        assert!(gateway.memory().is_empty());
    }
}
