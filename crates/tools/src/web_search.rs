//! Web search tool — stub that returns mock search results.
//!
//! Returns a plausible result for any query so the agent loop can be
//! exercised end-to-end without network access.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use cogwork_core::error::ToolError;
use cogwork_core::tool::{Tool, ToolResult};
use serde_json::json;

pub struct WebSearchTool;

fn search_url(query: &str) -> String {
    match reqwest::Url::parse_with_params("https://example.com/search", &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("https://example.com/search?q={query}"),
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "number",
                    "description": "Maximum number of results (default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, parameters: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = parameters["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidParameters("Missing 'query' parameter".into()))?;
        let max_results = parameters
            .get("max_results")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(5);

        // TODO: integrate a real search API (Brave, Google, etc.)
        let results = json!([{
            "title": format!("Search results for: {query}"),
            "url": search_url(query),
            "snippet": format!("Mock search result for \"{query}\". Integrate with real search API."),
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }]);
        let count = results.as_array().map(Vec::len).unwrap_or(0);

        Ok(ToolResult::ok(json!({
            "results": results,
            "query": query,
        }))
        .with_metadata(json!({"count": count, "max_results": max_results})))
    }
}
