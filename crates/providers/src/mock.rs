//! Mock gateway backend for tests and offline demos.
//!
//! Cycles through a scripted list of responses. When a prompt mentions
//! searching and a search-like tool is advertised, the mock answers with a
//! tool call so the full dispatch path can be exercised without network
//! access. Structured generation fabricates values from the schema.

use std::sync::Mutex;

use async_trait::async_trait;
use cogwork_core::error::GatewayError;
use cogwork_core::gateway::{Gateway, GatewayResponse};
use cogwork_core::tool::{ToolDescriptor, ToolInvocation};
use serde_json::{json, Value};

const DEFAULT_RESPONSES: [&str; 3] = [
    "This is a mock response from the mock gateway.",
    "Another mock response to simulate conversation.",
    "The mock gateway can return predefined responses for testing.",
];

struct MockState {
    responses: Vec<String>,
    index: usize,
}

/// Scripted gateway that never touches the network.
pub struct MockGateway {
    name: String,
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Create a mock gateway with the default canned responses.
    pub fn new() -> Self {
        Self::with_responses(DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect())
    }

    /// Create a mock gateway with scripted responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            name: "mock".into(),
            state: Mutex::new(MockState {
                responses,
                index: 0,
            }),
        }
    }

    /// Append a scripted response.
    pub fn add_response(&self, response: impl Into<String>) {
        let mut state = self.state.lock().expect("mock state lock poisoned");
        state.responses.push(response.into());
    }

    /// Rewind to the first scripted response.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state lock poisoned");
        state.index = 0;
    }

    fn next_response(&self) -> String {
        let mut state = self.state.lock().expect("mock state lock poisoned");
        if state.responses.is_empty() {
            return DEFAULT_RESPONSES[0].to_string();
        }
        let response = state.responses[state.index % state.responses.len()].clone();
        state.index += 1;
        response
    }

    /// Fabricate a value for one schema property.
    fn mock_property(key: &str, property: &Value) -> Value {
        match property.get("type").and_then(Value::as_str) {
            Some("string") => json!(format!("mock-{key}")),
            Some("number") => json!(42),
            Some("boolean") => json!(true),
            Some("array") => json!(["mock-item-1", "mock-item-2"]),
            Some(_) => json!(format!("mock-{key}-value")),
            None => json!(format!("mock-{key}-default")),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<GatewayResponse, GatewayError> {
        let scripted = self.next_response();

        let content = if prompt.to_lowercase().contains("hello") {
            "Hello! I'm a mock gateway. How can I help you today?".to_string()
        } else {
            scripted
        };

        Ok(GatewayResponse::text(content))
    }

    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        // Simulate tool calling when the prompt asks for a search and a
        // search-like tool is on the table.
        if prompt.to_lowercase().contains("search") {
            if let Some(tool) = tools.iter().find(|t| t.name.contains("search")) {
                return Ok(GatewayResponse {
                    content: "I need to search for that information.".into(),
                    tool_calls: vec![ToolInvocation::new(
                        tool.name.clone(),
                        json!({"query": "mock search query"}),
                    )],
                    usage: None,
                });
            }
        }

        self.generate(prompt).await
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        schema: &Value,
    ) -> Result<Value, GatewayError> {
        if schema.get("type").and_then(Value::as_str) == Some("object") {
            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                let mut data = serde_json::Map::new();
                for (key, property) in properties {
                    data.insert(key.clone(), Self::mock_property(key, property));
                }
                return Ok(Value::Object(data));
            }
        }

        Ok(json!({"result": "mock structured response"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_tool() -> ToolDescriptor {
        ToolDescriptor {
            name: "web_search".into(),
            description: "Search the web".into(),
            parameters: json!({"type": "object"}),
        }
    }

    #[tokio::test]
    async fn cycles_through_responses() {
        let gateway = MockGateway::new();
        let first = gateway.generate("one").await.unwrap().content;
        let second = gateway.generate("two").await.unwrap().content;
        let third = gateway.generate("three").await.unwrap().content;
        let wrapped = gateway.generate("four").await.unwrap().content;

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(wrapped, first);
    }

    #[tokio::test]
    async fn scripted_responses_in_order() {
        let gateway =
            MockGateway::with_responses(vec!["alpha".into(), "beta".into()]);
        assert_eq!(gateway.generate("x").await.unwrap().content, "alpha");
        assert_eq!(gateway.generate("x").await.unwrap().content, "beta");
        assert_eq!(gateway.generate("x").await.unwrap().content, "alpha");
    }

    #[tokio::test]
    async fn reset_rewinds_the_script() {
        let gateway = MockGateway::with_responses(vec!["alpha".into(), "beta".into()]);
        let _ = gateway.generate("x").await.unwrap();
        gateway.reset();
        assert_eq!(gateway.generate("x").await.unwrap().content, "alpha");
    }

    #[tokio::test]
    async fn add_response_extends_the_script() {
        let gateway = MockGateway::with_responses(vec!["alpha".into()]);
        gateway.add_response("omega");
        let _ = gateway.generate("x").await.unwrap();
        assert_eq!(gateway.generate("x").await.unwrap().content, "omega");
    }

    #[tokio::test]
    async fn empty_script_still_answers() {
        let gateway = MockGateway::with_responses(vec![]);
        let response = gateway.generate("x").await.unwrap();
        assert_eq!(response.content, DEFAULT_RESPONSES[0]);
    }

    #[tokio::test]
    async fn greets_on_hello() {
        let gateway = MockGateway::new();
        let response = gateway.generate("Hello there").await.unwrap();
        assert!(response.content.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn search_prompt_triggers_tool_call() {
        let gateway = MockGateway::new();
        let tools = vec![search_tool()];
        let response = gateway
            .generate_with_tools("Please search for rust news", &tools)
            .await
            .unwrap();

        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls[0].name, "web_search");
        assert_eq!(
            response.tool_calls[0].parameters["query"],
            "mock search query"
        );
    }

    #[tokio::test]
    async fn search_prompt_without_search_tool_falls_back() {
        let gateway = MockGateway::new();
        let response = gateway
            .generate_with_tools("Please search for rust news", &[])
            .await
            .unwrap();
        assert!(!response.has_tool_calls());
    }

    #[tokio::test]
    async fn structured_mock_follows_schema() {
        let gateway = MockGateway::new();
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "count": {"type": "number"},
                "done": {"type": "boolean"},
                "tags": {"type": "array"}
            }
        });

        let value = gateway.generate_structured("anything", &schema).await.unwrap();
        assert_eq!(value["title"], "mock-title");
        assert_eq!(value["count"], 42);
        assert_eq!(value["done"], true);
        assert_eq!(value["tags"], json!(["mock-item-1", "mock-item-2"]));
    }

    #[tokio::test]
    async fn structured_mock_fallback_for_non_object_schema() {
        let gateway = MockGateway::new();
        let value = gateway
            .generate_structured("anything", &json!({"type": "string"}))
            .await
            .unwrap();
        assert_eq!(value["result"], "mock structured response");
    }
}
