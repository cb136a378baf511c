//! Tool registry and the tools available to the model.
//!
//! Each tool returns a JSON result envelope: success envelopes echo the
//! inputs and carry `"success": true`; failures carry an `"error"` message
//! and `"success": false`. Every outcome is representable as an envelope,
//! so tool execution never aborts the agent loop.

mod calculate;
mod search;
mod weather;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{FunctionSchema, ToolSchema};

pub use calculate::Calculate;
pub use search::Search;
pub use weather::GetWeather;

/// Namespace prefix under which tools are declared to the gateway.
pub const TOOL_PREFIX: &str = "mcp__gateway__";

/// A tool the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Bare tool name, without the namespace prefix.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON-Schema `parameters` object declared to the gateway. Used only
    /// for the declaration; argument validation belongs to `execute`.
    fn parameters_schema(&self) -> Value;

    /// Execute with the parsed arguments object.
    ///
    /// `Err` is reserved for argument-binding failures (missing required
    /// parameter, wrong type); the registry converts it into an error
    /// envelope. Tool-internal failures (e.g. a bad expression) are
    /// returned as `Ok` envelopes with `"success": false`.
    async fn execute(&self, args: Value) -> anyhow::Result<Value>;
}

/// Static registry mapping tool names to their implementations.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with all available tools.
    pub fn new() -> Self {
        Self {
            tools: vec![
                Arc::new(Calculate),
                Arc::new(Search),
                Arc::new(GetWeather),
            ],
        }
    }

    /// Tool declarations for the completion API, with namespaced names.
    ///
    /// The same list is supplied unchanged on every API call.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|tool| ToolSchema {
                schema_type: "function".to_string(),
                function: FunctionSchema {
                    name: format!("{}{}", TOOL_PREFIX, tool.name()),
                    description: tool.description().to_string(),
                    parameters: tool.parameters_schema(),
                },
            })
            .collect()
    }

    /// Dispatch a tool call and return its result envelope.
    ///
    /// Accepts both prefixed and bare names. An unknown name yields an
    /// error envelope, not an `Err`: it is a normal outcome fed back into
    /// the conversation for the model to react to.
    pub async fn execute(&self, name: &str, args: Value) -> Value {
        let bare_name = name.strip_prefix(TOOL_PREFIX).unwrap_or(name);

        let Some(tool) = self.tools.iter().find(|t| t.name() == bare_name) else {
            return json!({
                "error": format!("unknown tool: {}", bare_name),
                "success": false,
            });
        };

        tracing::info!(tool = bare_name, "executing tool");

        match tool.execute(args).await {
            Ok(envelope) => envelope,
            Err(e) => json!({
                "error": e.to_string(),
                "success": false,
            }),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
