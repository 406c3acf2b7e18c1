//! The agent control loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cogwork_core::error::{Error, Result};
use cogwork_core::event::{AgentEvent, EventBus};
use cogwork_core::memory::ConversationMemory;
use cogwork_core::tool::{ToolCatalog, ToolDescriptor, ToolInvocation, ToolResult};
use cogwork_core::turn::Turn;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::augmented::AugmentedGateway;

/// An agent that reasons iteratively over a gateway and a tool catalog.
pub struct Agent {
    /// Agent identifier, used in events and logs
    name: String,

    /// Fixed system prompt text prepended to every prompt
    instructions: String,

    /// Gateway handle carrying this agent's conversation memory
    gateway: AugmentedGateway,

    /// The tools this agent may dispatch
    catalog: Arc<ToolCatalog>,

    /// Advertised tool names; empty means no restriction
    enabled_tools: HashSet<String>,

    /// Iteration bound per `run` invocation
    max_iterations: usize,

    /// Iterations consumed by the current `run`; resets on entry
    iteration_count: usize,

    /// How many remembered turns each prompt includes
    recent_window: usize,

    /// Event bus for runtime events
    events: Arc<EventBus>,
}

impl Agent {
    /// Create an agent with default limits and no tool restriction.
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        gateway: AugmentedGateway,
        catalog: Arc<ToolCatalog>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            gateway,
            catalog,
            enabled_tools: HashSet::new(),
            max_iterations: 10,
            iteration_count: 0,
            recent_window: 10,
            events: Arc::new(EventBus::default()),
        }
    }

    /// Set the iteration bound.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Restrict advertised tools to the given names.
    pub fn with_enabled_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_tools = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set how many remembered turns each prompt includes.
    pub fn with_recent_window(mut self, window: usize) -> Self {
        self.recent_window = window;
        self
    }

    /// Publish runtime events to the given bus.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Process one input and return the final answer.
    ///
    /// Loops up to the iteration bound: each pass sends the current prompt
    /// to the gateway, dispatches any requested tool calls, and feeds their
    /// formatted results back in as the next pass's input. A text-only
    /// response ends the run.
    ///
    /// Fails with [`Error::Gateway`] if a backend call fails and with
    /// [`Error::MaxIterationsExceeded`] if the bound is reached without a
    /// final answer. Memory keeps everything recorded up to the failure.
    pub async fn run(&mut self, input: &str) -> Result<String> {
        info!(agent = %self.name, "Starting run");
        self.events.publish(AgentEvent::RunStarted {
            agent: self.name.clone(),
            timestamp: Utc::now(),
        });

        match self.run_loop(input).await {
            Ok(answer) => {
                self.events.publish(AgentEvent::RunCompleted {
                    agent: self.name.clone(),
                    iterations: self.iteration_count,
                    timestamp: Utc::now(),
                });
                Ok(answer)
            }
            Err(e) => {
                self.events.publish(AgentEvent::RunFailed {
                    agent: self.name.clone(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    async fn run_loop(&mut self, input: &str) -> Result<String> {
        self.iteration_count = 0;
        self.gateway.remember(Turn::user(input));
        let mut current_input = input.to_string();

        while self.iteration_count < self.max_iterations {
            self.iteration_count += 1;
            debug!(
                agent = %self.name,
                iteration = self.iteration_count,
                "Agent loop iteration"
            );

            let prompt = self.build_prompt(&current_input);
            let tools = self.available_tools();
            let response = self.gateway.generate_response(&prompt, &tools).await?;

            self.events.publish(AgentEvent::ResponseGenerated {
                agent: self.name.clone(),
                backend: self.gateway.backend_name().to_string(),
                usage: response.usage,
                timestamp: Utc::now(),
            });

            if response.has_tool_calls() {
                let results = self.dispatch(&response.tool_calls).await;
                current_input = format_tool_results(&results);
                continue;
            }

            self.gateway.remember(Turn::assistant(response.content.clone()));
            return Ok(response.content);
        }

        Err(Error::MaxIterationsExceeded(self.max_iterations))
    }

    /// Execute tool requests in order, one result per request.
    ///
    /// Failures stay local: an unknown name, rejected arguments, or a
    /// failing execution becomes a failed [`ToolResult`] in that slot and
    /// the rest of the batch still runs. Every outcome is recorded as a
    /// `system` turn carrying the call and result in its metadata.
    async fn dispatch(&mut self, requests: &[ToolInvocation]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let started = Instant::now();
            let result = match self
                .catalog
                .execute(&request.name, request.parameters.clone())
                .await
            {
                Ok(result) => result,
                Err(e) => ToolResult::fail(e.to_string()),
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            if let Some(error) = &result.error {
                warn!(tool = %request.name, error = %error, "Tool execution failed");
            }

            self.events.publish(AgentEvent::ToolExecuted {
                tool_name: request.name.clone(),
                success: result.success,
                duration_ms,
                timestamp: Utc::now(),
            });

            let status = if result.success { "Success" } else { "Failed" };
            self.gateway.remember(
                Turn::system(format!("Tool {} executed: {}", request.name, status))
                    .with_metadata(
                        "tool_call",
                        serde_json::to_value(request).unwrap_or(Value::Null),
                    )
                    .with_metadata(
                        "result",
                        serde_json::to_value(&result).unwrap_or(Value::Null),
                    ),
            );

            results.push(result);
        }

        results
    }

    /// Assemble the iteration prompt.
    fn build_prompt(&self, input: &str) -> String {
        let conversation = self
            .gateway
            .recent(self.recent_window)
            .iter()
            .map(|turn| turn.render())
            .collect::<Vec<_>>()
            .join("\n");

        let tools = self
            .available_tools()
            .iter()
            .map(|descriptor| descriptor.render())
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nRecent conversation:\n{}\n\nAvailable tools:\n{}\n\nCurrent request: {}\n\n\
             Think step by step. If you need to use tools, specify them clearly. \
             If you have enough information to provide a final answer, do so.",
            self.instructions, conversation, tools, input
        )
    }

    /// The descriptors advertised to the model this turn.
    ///
    /// The full catalog intersected with the enabled-name set; an empty set
    /// means no restriction, not "none".
    pub fn available_tools(&self) -> Vec<ToolDescriptor> {
        self.catalog
            .descriptors()
            .into_iter()
            .filter(|descriptor| {
                self.enabled_tools.is_empty() || self.enabled_tools.contains(&descriptor.name)
            })
            .collect()
    }

    /// Add a name to the enabled set.
    pub fn enable_tool(&mut self, name: impl Into<String>) {
        self.enabled_tools.insert(name.into());
    }

    /// Remove a name from the enabled set.
    pub fn disable_tool(&mut self, name: &str) {
        self.enabled_tools.remove(name);
    }

    /// Clear the enabled set back to "no restriction".
    pub fn enable_all_tools(&mut self) {
        self.enabled_tools.clear();
    }

    /// The current enabled-name set; empty means all tools are advertised.
    pub fn enabled_tools(&self) -> &HashSet<String> {
        &self.enabled_tools
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Read access to this agent's conversation memory.
    pub fn memory(&self) -> &ConversationMemory {
        self.gateway.memory()
    }

    /// The gateway handle this agent reasons through.
    pub fn gateway(&self) -> &AugmentedGateway {
        &self.gateway
    }
}

/// Render dispatch results as the next iteration's input text.
fn format_tool_results(results: &[ToolResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            if result.success {
                let data = result.data.clone().unwrap_or(Value::Null);
                let rendered =
                    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "null".into());
                format!("Tool {} succeeded: {}", i + 1, rendered)
            } else {
                format!(
                    "Tool {} failed: {}",
                    i + 1,
                    result.error.as_deref().unwrap_or("Unknown error")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
