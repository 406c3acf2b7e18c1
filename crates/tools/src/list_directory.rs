//! List directory contents, optionally walking subdirectories.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;

pub struct ListDirectoryTool;

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

impl ListDirectoryTool {
    async fn read_entries(dir: &Path) -> std::io::Result<std::vec::IntoIter<Entry>> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries.into_iter())
    }

    /// Depth-first listing. Each directory entry appears before the entries
    /// inside it.
    async fn walk(dirpath: &str, recursive: bool) -> std::io::Result<Vec<serde_json::Value>> {
        let mut items = Vec::new();
        let mut stack = vec![Self::read_entries(Path::new(dirpath)).await?];

        while let Some(top) = stack.last_mut() {
            match top.next() {
                Some(entry) => {
                    items.push(json!({
                        "name": entry.name,
                        "path": entry.path.to_string_lossy(),
                        "type": if entry.is_dir { "directory" } else { "file" },
                    }));
                    if recursive && entry.is_dir {
                        stack.push(Self::read_entries(&entry.path).await?);
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List contents of a directory"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "dirpath": {
                    "type": "string",
                    "description": "Path to the directory"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Walk subdirectories (default false)"
                }
            },
            "required": ["dirpath"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let dirpath = parameters["dirpath"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'dirpath' parameter".into()))?;
        let recursive = parameters
            .get("recursive")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        match Self::walk(dirpath, recursive).await {
            Ok(items) => {
                let count = items.len();
                Ok(ToolResult::ok(json!({
                    "items": items,
                    "count": count,
                }))
                .with_metadata(json!({"dirpath": dirpath, "recursive": recursive})))
            }
            Err(e) => Ok(ToolResult::fail(format!("Failed to list directory: {e}"))
                .with_metadata(json!({"dirpath": dirpath}))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(result: &ToolResult) -> Vec<String> {
        result.data.as_ref().unwrap()["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn tool_definition() {
        let tool = ListDirectoryTool;
        assert_eq!(tool.name(), "list_directory");
        assert_eq!(tool.parameters_schema()["required"], json!(["dirpath"]));
    }

    #[tokio::test]
    async fn flat_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), "b").unwrap();

        let tool = ListDirectoryTool;
        let result = tool
            .execute(json!({"dirpath": dir.path().to_str().unwrap()}))
            .await
            .unwrap();

        assert!(result.success);
        let data = result.data.as_ref().unwrap();
        assert_eq!(data["count"], 2);

        let mut listed = names(&result);
        listed.sort();
        assert_eq!(listed, vec!["a.txt", "sub"]);

        let meta = result.metadata.unwrap();
        assert_eq!(meta["recursive"], false);
    }

    #[tokio::test]
    async fn recursive_listing_includes_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        std::fs::write(dir.path().join("sub/inner/deep.txt"), "x").unwrap();

        let tool = ListDirectoryTool;
        let result = tool
            .execute(json!({
                "dirpath": dir.path().to_str().unwrap(),
                "recursive": true,
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.as_ref().unwrap()["count"], 3);

        let listed = names(&result);
        assert!(listed.contains(&"deep.txt".to_string()));

        // Parent directories come before their contents.
        let sub = listed.iter().position(|n| n == "sub").unwrap();
        let inner = listed.iter().position(|n| n == "inner").unwrap();
        let deep = listed.iter().position(|n| n == "deep.txt").unwrap();
        assert!(sub < inner);
        assert!(inner < deep);
    }

    #[tokio::test]
    async fn entry_types_are_labelled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "f").unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();

        let tool = ListDirectoryTool;
        let result = tool
            .execute(json!({"dirpath": dir.path().to_str().unwrap()}))
            .await
            .unwrap();

        let items = result.data.as_ref().unwrap()["items"].as_array().unwrap().clone();
        for item in items {
            match item["name"].as_str().unwrap() {
                "f.txt" => assert_eq!(item["type"], "file"),
                "d" => assert_eq!(item["type"], "directory"),
                other => panic!("unexpected entry {other}"),
            }
        }
    }

    #[tokio::test]
    async fn missing_directory_fails() {
        let tool = ListDirectoryTool;
        let result = tool
            .execute(json!({"dirpath": "/tmp/cogwork_test_no_such_dir_12345"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("Failed to list directory:"));
    }
}
