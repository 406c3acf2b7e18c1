//! Fetch the body of a URL.

use std::time::Duration;

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;

const USER_AGENT: &str = "cogwork/1.0";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch content from a URL"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch"
                },
                "timeout": {
                    "type": "number",
                    "description": "Timeout in milliseconds (default 10000)"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let url = parameters["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'url' parameter".into()))?;
        let timeout = parameters
            .get("timeout")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let response = match self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_millis(timeout))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Ok(ToolResult::fail(format!("Fetch failed: {e}"))
                    .with_metadata(json!({"url": url})));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(ToolResult::fail(format!(
                "Fetch failed: HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ))
            .with_metadata(json!({"url": url})));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match response.text().await {
            Ok(content) => {
                let size = content.len();
                Ok(ToolResult::ok(json!({
                    "content": content,
                    "contentType": content_type,
                    "status": status.as_u16(),
                }))
                .with_metadata(json!({"url": url, "size": size})))
            }
            Err(e) => Ok(ToolResult::fail(format!("Fetch failed: {e}"))
                .with_metadata(json!({"url": url}))),
        }
    }
}
