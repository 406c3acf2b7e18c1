//! Anthropic Messages API backend.
//!
//! Uses the native Messages API:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - Response content arrives as typed blocks (`text` / `tool_use`)
//! - Usage reports input and output tokens separately; the total is their sum

use async_trait::async_trait;
use cogwork_core::error::GatewayError;
use cogwork_core::gateway::{Gateway, GatewayResponse, Usage};
use cogwork_core::tool::{ToolDescriptor, ToolInvocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Appended to the prompt when requesting structured output.
const STRUCTURED_OUTPUT_NUDGE: &str =
    "\n\nPlease respond using the structured_output function with the required data.";

/// Anthropic native Messages API gateway.
pub struct AnthropicGateway {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl AnthropicGateway {
    /// Create a new Anthropic gateway with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        }
    }

    /// Use a custom base URL (e.g. for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn messages(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}/v1/messages", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(tools));
        }

        debug!(gateway = "anthropic", model = %self.model, tools = tools.len(), "Sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GatewayError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(GatewayError::AuthenticationFailed(
                "Invalid Anthropic API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Anthropic API error");
            return Err(GatewayError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: MessagesResponse = response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse Anthropic response: {e}"))
        })?;

        Ok(Self::to_gateway_response(api_resp))
    }

    /// Convert descriptors to Anthropic tool format.
    fn to_api_tools(tools: &[ToolDescriptor]) -> Vec<ApiTool> {
        tools
            .iter()
            .map(|t| ApiTool {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.parameters.clone(),
            })
            .collect()
    }

    /// Flatten response content blocks into text and tool invocations.
    fn to_gateway_response(resp: MessagesResponse) -> GatewayResponse {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for block in resp.content {
            match block {
                ContentBlock::Text { text } => content.push_str(&text),
                ContentBlock::ToolUse { name, input } => {
                    tool_calls.push(ToolInvocation::new(name, input));
                }
            }
        }

        let usage = Some(Usage {
            prompt_tokens: resp.usage.input_tokens,
            completion_tokens: resp.usage.output_tokens,
            total_tokens: resp.usage.input_tokens + resp.usage.output_tokens,
        });

        GatewayResponse {
            content,
            tool_calls,
            usage,
        }
    }
}

#[async_trait]
impl Gateway for AnthropicGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<GatewayResponse, GatewayError> {
        self.messages(prompt, &[]).await
    }

    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        self.messages(prompt, tools).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let tool = ToolDescriptor {
            name: "structured_output".into(),
            description: "Return structured data according to the schema".into(),
            parameters: schema.clone(),
        };

        let prompt = format!("{prompt}{STRUCTURED_OUTPUT_NUDGE}");
        let response = self.messages(&prompt, std::slice::from_ref(&tool)).await?;

        if let Some(call) = response.tool_calls.first() {
            if call.name == "structured_output" {
                return Ok(call.parameters.clone());
            }
        }

        // Some models answer with plain JSON content instead of calling the
        // function.
        serde_json::from_str(&response.content).map_err(|_| {
            GatewayError::MalformedResponse(
                "Failed to get structured output from Anthropic".into(),
            )
        })
    }
}

// --- Anthropic API types ---

#[derive(Debug, Serialize)]
struct ApiTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}
