//! Read the contents of a file.

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read contents of a file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "filepath": {
                    "type": "string",
                    "description": "Path to the file"
                }
            },
            "required": ["filepath"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filepath = parameters["filepath"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'filepath' parameter".into()))?;

        match tokio::fs::read_to_string(filepath).await {
            Ok(content) => {
                let size = content.len();
                Ok(ToolResult::ok(json!({
                    "content": content,
                    "filepath": filepath,
                }))
                .with_metadata(json!({"size": size})))
            }
            Err(e) => Ok(ToolResult::fail(format!("Failed to read file: {e}"))
                .with_metadata(json!({"filepath": filepath}))),
        }
    }
}
