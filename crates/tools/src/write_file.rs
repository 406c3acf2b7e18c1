//! Write content to a file, creating parent directories by default.

use std::path::Path;

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;

pub struct WriteFileTool;

impl WriteFileTool {
    async fn write(filepath: &str, content: &str, create_dirs: bool) -> std::io::Result<()> {
        if create_dirs {
            if let Some(parent) = Path::new(filepath).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
        tokio::fs::write(filepath, content).await
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "filepath": {
                    "type": "string",
                    "description": "Path to the file"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write"
                },
                "create_dirs": {
                    "type": "boolean",
                    "description": "Create missing parent directories (default true)"
                }
            },
            "required": ["filepath", "content"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filepath = parameters["filepath"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'filepath' parameter".into()))?;
        let content = parameters["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'content' parameter".into()))?;
        let create_dirs = parameters
            .get("create_dirs")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true);

        match Self::write(filepath, content, create_dirs).await {
            Ok(()) => Ok(ToolResult::ok(json!({
                "filepath": filepath,
                "bytes_written": content.len(),
            }))),
            Err(e) => Ok(ToolResult::fail(format!("Failed to write file: {e}"))
                .with_metadata(json!({"filepath": filepath}))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition() {
        let tool = WriteFileTool;
        assert_eq!(tool.name(), "write_file");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["filepath", "content"]));
    }

    #[tokio::test]
    async fn write_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("out.txt");

        let tool = WriteFileTool;
        let result = tool
            .execute(json!({
                "filepath": file_path.to_str().unwrap(),
                "content": "written by test",
            }))
            .await
            .unwrap();

        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["bytes_written"], 15);
        assert_eq!(
            std::fs::read_to_string(&file_path).unwrap(),
            "written by test"
        );
    }

    #[tokio::test]
    async fn creates_parent_directories_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("a/b/c/out.txt");

        let tool = WriteFileTool;
        let result = tool
            .execute(json!({
                "filepath": file_path.to_str().unwrap(),
                "content": "nested",
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn create_dirs_false_fails_on_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("missing/out.txt");

        let tool = WriteFileTool;
        let result = tool
            .execute(json!({
                "filepath": file_path.to_str().unwrap(),
                "content": "nope",
                "create_dirs": false,
            }))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Failed to write file:"));
    }

    #[tokio::test]
    async fn missing_content_parameter() {
        let tool = WriteFileTool;
        let result = tool.execute(json!({"filepath": "/tmp/x.txt"})).await;
        assert!(matches!(result, Err(ToolError::InvalidParameters(_))));
    }
}
