//! Execute shell commands with a timeout.
//!
//! Commands run through `sh -c`, so pipes and redirects work. A failed
//! command is a contained failure: the captured output and exit code still
//! come back in the result data.

use std::time::Duration;

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;
use tracing::debug;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub struct ShellCommandTool;

fn effective_cwd(cwd: Option<&str>) -> String {
    match cwd {
        Some(dir) => dir.to_string(),
        None => std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".into()),
    }
}

#[async_trait]
impl Tool for ShellCommandTool {
    fn name(&self) -> &str {
        "shell_command"
    }

    fn description(&self) -> &str {
        "Execute shell commands"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Command line to execute"
                },
                "cwd": {
                    "type": "string",
                    "description": "Working directory (default: current)"
                },
                "timeout": {
                    "type": "number",
                    "description": "Timeout in milliseconds (default 30000)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let command = parameters["command"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'command' parameter".into()))?;
        let cwd = parameters.get("cwd").and_then(serde_json::Value::as_str);
        let timeout_ms = parameters
            .get("timeout")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let cwd_label = effective_cwd(cwd);

        debug!(command, cwd = %cwd_label, timeout_ms, "Running shell command");

        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = match tokio::time::timeout(Duration::from_millis(timeout_ms), cmd.output())
            .await
        {
            Err(_) => {
                return Ok(ToolResult::fail(format!(
                    "Command failed: timed out after {timeout_ms} ms"
                ))
                .with_data(json!({
                    "stdout": "",
                    "stderr": "",
                    "command": command,
                    "exit_code": 1,
                }))
                .with_metadata(json!({"cwd": cwd_label})));
            }
            Ok(Err(e)) => {
                return Ok(ToolResult::fail(format!("Command failed: {e}"))
                    .with_data(json!({
                        "stdout": "",
                        "stderr": "",
                        "command": command,
                        "exit_code": 1,
                    }))
                    .with_metadata(json!({"cwd": cwd_label})));
            }
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            Ok(ToolResult::ok(json!({
                "stdout": stdout,
                "stderr": stderr,
                "command": command,
                "exit_code": 0,
            }))
            .with_metadata(json!({"cwd": cwd_label})))
        } else {
            let exit_code = output.status.code().unwrap_or(1);
            Ok(ToolResult::fail(format!("Command failed: {}", output.status))
                .with_data(json!({
                    "stdout": stdout,
                    "stderr": stderr,
                    "command": command,
                    "exit_code": exit_code,
                }))
                .with_metadata(json!({"cwd": cwd_label})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition() {
        let tool = ShellCommandTool;
        assert_eq!(tool.name(), "shell_command");
        assert_eq!(tool.parameters_schema()["required"], json!(["command"]));
    }

    #[tokio::test]
    async fn echo_succeeds_with_trimmed_stdout() {
        let tool = ShellCommandTool;
        let result = tool
            .execute(json!({"command": "echo hello"}))
            .await
            .unwrap();

        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["stdout"], "hello");
        assert_eq!(data["stderr"], "");
        assert_eq!(data["exit_code"], 0);
        assert_eq!(data["command"], "echo hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_contained_failure() {
        let tool = ShellCommandTool;
        let result = tool
            .execute(json!({"command": "echo oops >&2; exit 3"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Command failed:"));
        let data = result.data.unwrap();
        assert_eq!(data["stderr"], "oops");
        assert_eq!(data["exit_code"], 3);
    }

    #[tokio::test]
    async fn cwd_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = std::fs::canonicalize(dir.path()).unwrap();

        let tool = ShellCommandTool;
        let result = tool
            .execute(json!({
                "command": "pwd",
                "cwd": dir.path().to_str().unwrap(),
            }))
            .await
            .unwrap();

        assert!(result.success);
        let data = result.data.as_ref().unwrap();
        assert_eq!(data["stdout"], canonical.display().to_string());
        assert_eq!(
            result.metadata.unwrap()["cwd"],
            dir.path().to_str().unwrap()
        );
    }

    #[tokio::test]
    async fn timeout_kills_the_command() {
        let tool = ShellCommandTool;
        let result = tool
            .execute(json!({"command": "sleep 5", "timeout": 50}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out after 50 ms"));
    }

    #[tokio::test]
    async fn missing_command_parameter() {
        let tool = ShellCommandTool;
        let result = tool.execute(json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidParameters(_))));
    }
}
