//! Model gateway trait — the abstraction over LLM backends.
//!
//! A gateway adapts one logical request ("generate a response, optionally
//! considering a tool catalog") to a concrete backend API. The agent loop
//! only ever sees the uniform [`GatewayResponse`] shape; backend selection
//! happens at construction and is never inspected afterwards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::tool::{ToolDescriptor, ToolInvocation};

/// Token accounting reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The uniform response shape every backend adapts to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Text content (may be empty when the model only requests tools)
    pub content: String,

    /// Tool invocations requested by the model, in request order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocation>,

    /// Token usage, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl GatewayResponse {
    /// A plain text response with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            usage: None,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// The model gateway boundary.
///
/// Failures raised here are fatal for the surrounding `run` invocation;
/// retry policy (if any) belongs to the backend, not to the agent loop.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Stable backend identifier, used only for diagnostics.
    fn name(&self) -> &str;

    /// Generate a response to a bare prompt.
    async fn generate(&self, prompt: &str) -> std::result::Result<GatewayResponse, GatewayError>;

    /// Generate a response with a tool catalog the model may draw on.
    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> std::result::Result<GatewayResponse, GatewayError>;

    /// Produce a value conforming to `schema`.
    ///
    /// Backends decide how (function calling, JSON-mode prompting); callers
    /// deserialize the returned value into their own types.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> std::result::Result<serde_json::Value, GatewayError>;
}

impl std::fmt::Debug for dyn Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("name", &self.name()).finish()
    }
}
