//! OpenAI chat-completions backend.
//!
//! Talks to `POST {base_url}/chat/completions` with Bearer authentication.
//! Tool use goes through function calling: descriptors are advertised as
//! `function` tools with `tool_choice: "auto"`, and returned call arguments
//! arrive as a JSON string that is parsed back into invocation parameters.
//! Structured output is implemented with a synthetic `structured_output`
//! function carrying the schema.

use async_trait::async_trait;
use cogwork_core::error::GatewayError;
use cogwork_core::gateway::{Gateway, GatewayResponse, Usage};
use cogwork_core::tool::{ToolDescriptor, ToolInvocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Appended to the prompt when requesting structured output.
const STRUCTURED_OUTPUT_NUDGE: &str =
    "\n\nPlease respond using the structured_output function with the required data.";

/// OpenAI chat-completions gateway.
pub struct OpenAiGateway {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiGateway {
    /// Create a new OpenAI gateway with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "openai".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        }
    }

    /// Use a custom base URL (e.g. an OpenAI-compatible proxy).
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

    async fn chat(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if !tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(tools));
            body["tool_choice"] = serde_json::json!("auto");
        }

        debug!(gateway = "openai", model = %self.model, tools = tools.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
                "Invalid OpenAI API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "OpenAI API error");
            return Err(GatewayError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: ChatCompletionResponse = response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse OpenAI response: {e}"))
        })?;

        Self::to_gateway_response(api_resp)
    }

    /// Convert descriptors to the function-calling tool format.
    fn to_api_tools(tools: &[ToolDescriptor]) -> Vec<ApiTool> {
        tools
            .iter()
            .map(|t| ApiTool {
                kind: "function".into(),
                function: ApiFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    /// Convert an API response to our gateway response.
    fn to_gateway_response(
        resp: ChatCompletionResponse,
    ) -> Result<GatewayResponse, GatewayError> {
        let choice = resp.choices.into_iter().next().ok_or_else(|| {
            GatewayError::MalformedResponse("No response choices returned".into())
        })?;

        let mut tool_calls = Vec::new();
        for call in choice.message.tool_calls {
            let parameters: serde_json::Value = serde_json::from_str(&call.function.arguments)
                .map_err(|e| {
                    GatewayError::MalformedResponse(format!(
                        "Invalid arguments for tool call '{}': {e}",
                        call.function.name
                    ))
                })?;
            tool_calls.push(ToolInvocation::new(call.function.name, parameters));
        }

        let usage = resp.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(GatewayResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}

#[async_trait]
impl Gateway for OpenAiGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<GatewayResponse, GatewayError> {
        self.chat(prompt, &[]).await
    }

    async fn generate_with_tools(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<GatewayResponse, GatewayError> {
        self.chat(prompt, tools).await
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
        let response = self.chat(&prompt, std::slice::from_ref(&tool)).await?;

        if let Some(call) = response.tool_calls.first() {
            if call.name == "structured_output" {
                return Ok(call.parameters.clone());
            }
        }

        // Some models answer with plain JSON content instead of calling the
        // function.
        serde_json::from_str(&response.content).map_err(|_| {
            GatewayError::MalformedResponse("Failed to get structured output from OpenAI".into())
        })
    }
}

// --- OpenAI API types ---

#[derive(Debug, Serialize)]
struct ApiTool {
    #[serde(rename = "type")]
    kind: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize)]
struct ApiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Debug, Deserialize)]
struct ApiToolCall {
    function: ApiFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ApiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
