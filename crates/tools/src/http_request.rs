//! Make raw HTTP requests.
//!
//! Unlike `web_fetch`, a non-2xx status is still a successful tool result;
//! the status code and body are handed back to the model as data.

use std::time::Duration;

use async_trait::async_trait;
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;

const USER_AGENT: &str = "cogwork/1.0";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

pub struct HttpRequestTool {
    client: reqwest::Client,
}

impl HttpRequestTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Default headers with the caller's headers layered on top.
    fn build_headers(
        user: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<HeaderMap, ToolError> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        if let Some(user) = user {
            for (key, value) in user {
                let value = value.as_str().ok_or_else(|| {
                    ToolError::InvalidParameters(format!("header '{key}' must be a string"))
                })?;
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    ToolError::InvalidParameters(format!("invalid header name '{key}': {e}"))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    ToolError::InvalidParameters(format!("invalid value for header '{key}': {e}"))
                })?;
                headers.insert(name, value);
            }
        }

        Ok(headers)
    }
}

impl Default for HttpRequestTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for HttpRequestTool {
    fn name(&self) -> &str {
        "http_request"
    }

    fn description(&self) -> &str {
        "Make HTTP requests"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "Request URL"
                },
                "method": {
                    "type": "string",
                    "enum": METHODS,
                    "description": "HTTP method (default GET)"
                },
                "headers": {
                    "type": "object",
                    "description": "Extra request headers"
                },
                "body": {
                    "type": "string",
                    "description": "Request body (POST, PUT and PATCH only)"
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
        let method = parameters
            .get("method")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("GET");
        let body = parameters.get("body").and_then(serde_json::Value::as_str);
        let timeout = parameters
            .get("timeout")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let method_enum = match method {
            "GET" => reqwest::Method::GET,
            "POST" => reqwest::Method::POST,
            "PUT" => reqwest::Method::PUT,
            "DELETE" => reqwest::Method::DELETE,
            "PATCH" => reqwest::Method::PATCH,
            other => {
                return Err(ToolError::InvalidParameters(format!(
                    "method must be one of {METHODS:?}, got '{other}'"
                )));
            }
        };

        let headers = Self::build_headers(
            parameters
                .get("headers")
                .and_then(serde_json::Value::as_object),
        )?;

        let mut request = self
            .client
            .request(method_enum, url)
            .headers(headers)
            .timeout(Duration::from_millis(timeout));

        if let Some(body) = body {
            if matches!(method, "POST" | "PUT" | "PATCH") {
                request = request.body(body.to_string());
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return Ok(ToolResult::fail(format!("HTTP request failed: {e}"))
                    .with_metadata(json!({"url": url, "method": method})));
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        let mut response_headers = serde_json::Map::new();
        for (name, value) in response.headers() {
            response_headers.insert(
                name.as_str().to_string(),
                json!(String::from_utf8_lossy(value.as_bytes())),
            );
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return Ok(ToolResult::fail(format!("HTTP request failed: {e}"))
                    .with_metadata(json!({"url": url, "method": method})));
            }
        };

        // JSON bodies come back parsed; anything else stays raw text.
        let data = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(parsed) => parsed,
            Err(_) => serde_json::Value::String(text),
        };

        Ok(ToolResult::ok(json!({
            "data": data,
            "status": status.as_u16(),
            "statusText": status_text,
            "headers": response_headers,
        }))
        .with_metadata(json!({"url": url, "method": method})))
    }
}
