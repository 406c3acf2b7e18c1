//! Shared test helpers for agent tests.

use std::sync::Mutex;

use async_trait::async_trait;
use cogwork_core::error::{GatewayError, ToolError};
use cogwork_core::gateway::{Gateway, GatewayResponse, Usage};
use cogwork_core::tool::{Tool, ToolDescriptor, ToolInvocation, ToolResult};
use serde_json::json;

/// A gateway that returns a sequence of scripted responses.
///
/// Each `generate*` call returns the next response in the queue and records
/// the prompt it was handed. Panics if more calls are made than responses
/// provided.
pub struct SequentialMockGateway {
    responses: Mutex<Vec<GatewayResponse>>,
    call_count: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
    tool_counts: Mutex<Vec<usize>>,
}

impl SequentialMockGateway {
    pub fn new(responses: Vec<GatewayResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            prompts: Mutex::new(Vec::new()),
            tool_counts: Mutex::new(Vec::new()),
        }
    }

    /// A gateway that returns a single text response (no tool calls).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A gateway that first requests tool calls, then gives a final answer.
    pub fn tool_then_answer(tool_calls: Vec<ToolInvocation>, answer: &str) -> Self {
        Self::new(vec![
            make_tool_call_response(tool_calls, ""),
            make_text_response(answer),
        ])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// How many tool descriptors each call advertised (0 = bare `generate`).
    pub fn tool_counts(&self) -> Vec<usize> {
        self.tool_counts.lock().unwrap().clone()
    }

    fn next(&self, prompt: &str, tools: usize) -> GatewayResponse {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.tool_counts.lock().unwrap().push(tools);

        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if *count >= responses.len() {
            panic!(
                "SequentialMockGateway: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }
        let response = responses[*count].clone();
        *count += 1;
        response
    }
}

#[async_trait]
impl Gateway for SequentialMockGateway {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn generate(&self, prompt: &str) -> Result<GatewayResponse, GatewayError> {
        Ok(self.next(prompt, 0))
    }

    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        Ok(self.next(prompt, tools.len()))
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(json!({"result": "structured"}))
    }
}

/// A gateway whose every call fails with the given error message.
pub struct FailingGateway {
    pub message: String,
}

#[async_trait]
impl Gateway for FailingGateway {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<GatewayResponse, GatewayError> {
        Err(GatewayError::Network(self.message.clone()))
    }

    async fn generate_with_tools(
        &self,
        _prompt: &str,
        _tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        Err(GatewayError::Network(self.message.clone()))
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        Err(GatewayError::Network(self.message.clone()))
    }
}

/// A tool that always succeeds, echoing its `text` argument.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the provided text back"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Text to echo"}
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let text = arguments.get("text").cloned().unwrap_or(serde_json::Value::Null);
        Ok(ToolResult::ok(json!({"echo": text})))
    }
}

/// A tool whose execution always fails with a fixed reason.
pub struct BrokenTool;

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::fail("disk on fire"))
    }
}

/// A text response with token usage attached.
pub fn make_text_response(text: &str) -> GatewayResponse {
    GatewayResponse {
        content: text.to_string(),
        tool_calls: vec![],
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// A response requesting tool calls, with optional accompanying text.
pub fn make_tool_call_response(tool_calls: Vec<ToolInvocation>, content: &str) -> GatewayResponse {
    GatewayResponse {
        content: content.to_string(),
        tool_calls,
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}
