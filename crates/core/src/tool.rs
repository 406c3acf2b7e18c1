//! Tool trait and catalog — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world:
//! execute shell commands, read/write files, fetch URLs, etc.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::schema;

/// The advertised shape of a tool: what the model sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name
    pub name: String,

    /// Human-readable description (sent to the model)
    pub description: String,

    /// JSON Schema describing accepted parameters
    pub parameters: serde_json::Value,
}

impl ToolDescriptor {
    /// Prompt rendering: `- name: description`.
    pub fn render(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

/// A tool invocation requested by the model.
///
/// Transient: consumed by dispatch within the iteration that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub parameters: serde_json::Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// The outcome of one tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// Structured payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Failure text on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional open-ended metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ToolResult {
    /// A successful result carrying structured data.
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: None,
        }
    }

    /// A failed result carrying the failure's message text.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata: None,
        }
    }

    /// Attach a metadata object (builder-style). Non-object values are
    /// ignored.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = metadata {
            self.metadata = Some(map);
        }
        self
    }

    /// Attach structured data to a result (builder-style).
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The core Tool trait.
///
/// Each tool (shell_command, read_file, http_request, etc.) implements this
/// trait. Tools are registered in the [`ToolCatalog`] and advertised to the
/// model by the agent loop.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "shell_command", "read_file").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Check arguments against the parameter contract.
    ///
    /// The catalog invokes this before every execution, uniformly for every
    /// tool; the default checks the declared schema.
    fn validate(&self, arguments: &serde_json::Value) -> std::result::Result<(), ToolError> {
        schema::validate_arguments(&self.parameters_schema(), arguments)
    }

    /// Execute the tool with the given arguments.
    ///
    /// Runtime failures (missing file, non-zero exit) return a failed
    /// [`ToolResult`]; raising is reserved for contract violations.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// This tool's advertised descriptor.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, keyed by unique name.
///
/// Registration order is preserved: it drives both the advertised descriptor
/// list and the prompt rendering order. The catalog is read-mostly after
/// construction; agents hold shared references to it.
pub struct ToolCatalog {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its original position.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Remove a tool by name. Returns whether it was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.tools.iter().position(|t| t.name() == name) {
            Some(index) => {
                self.tools.remove(index);
                true
            }
            None => false,
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up, validate, and execute one tool call.
    ///
    /// Raises [`ToolError::NotFound`] for unknown names and
    /// [`ToolError::InvalidParameters`] when the arguments fail the tool's
    /// contract; dispatch converts both into failed results.
    pub async fn execute(
        &self,
        name: &str,
        parameters: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.validate(&parameters)?;
        tool.execute(parameters).await
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            Ok(ToolResult::ok(
                serde_json::json!({"echo": arguments["text"]}),
            ))
        }
    }

    struct NoopTool;

    #[async_trait]
    impl Tool for NoopTool {
        fn name(&self) -> &str {
            "noop"
        }
        fn description(&self) -> &str {
            "Does nothing"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            Ok(ToolResult::ok(serde_json::Value::Null))
        }
    }

    #[test]
    fn catalog_register_and_lookup() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool));
        assert!(catalog.get("echo").is_some());
        assert!(catalog.get("nonexistent").is_none());
        assert!(catalog.contains("echo"));
    }

    #[test]
    fn catalog_preserves_registration_order() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(NoopTool));
        catalog.register(Box::new(EchoTool));
        assert_eq!(catalog.names(), vec!["noop", "echo"]);

        // Re-registering keeps the original position.
        catalog.register(Box::new(NoopTool));
        assert_eq!(catalog.names(), vec!["noop", "echo"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn catalog_unregister() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool));
        assert!(catalog.unregister("echo"));
        assert!(!catalog.unregister("echo"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn descriptor_renders_prompt_line() {
        let descriptor = EchoTool.descriptor();
        assert_eq!(descriptor.render(), "- echo: Echoes back the input");
    }

    #[tokio::test]
    async fn catalog_execute_tool() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool));

        let result = catalog
            .execute("echo", serde_json::json!({"text": "hello world"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.data.unwrap(),
            serde_json::json!({"echo": "hello world"})
        );
    }

    #[tokio::test]
    async fn catalog_execute_missing_tool() {
        let catalog = ToolCatalog::new();
        let err = catalog
            .execute("nonexistent", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert_eq!(err.to_string(), "Tool 'nonexistent' not found");
    }

    #[tokio::test]
    async fn catalog_validates_before_execute() {
        let mut catalog = ToolCatalog::new();
        catalog.register(Box::new(EchoTool));

        let err = catalog
            .execute("echo", serde_json::json!({"text": 42}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }
}
