//! Core agent loop implementation.

use std::sync::Arc;

use serde_json::json;

use crate::config::Config;
use crate::llm::{ChatMessage, GatewayClient, LlmClient, ToolCall};
use crate::tools::ToolRegistry;

/// The tool-calling agent.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(GatewayClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
        ));
        Self::with_client(config, llm)
    }

    /// Create an agent backed by a custom completion client.
    pub fn with_client(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        let tools = ToolRegistry::new();

        Self { config, llm, tools }
    }

    /// Run one user query to completion and return the final answer.
    ///
    /// The conversation history lives only for this call; nothing is
    /// persisted between queries.
    pub async fn run(&self, user_message: &str) -> anyhow::Result<String> {
        let mut messages = vec![ChatMessage::user(user_message)];

        // The same declaration list is supplied unchanged on every call.
        let tool_schemas = self.tools.schemas();

        // Agent loop
        for round in 0..self.config.max_tool_rounds {
            tracing::debug!("Agent round {}", round + 1);

            // Call the completion API. Transport errors are fatal for the
            // turn: propagated, not retried.
            let response = self
                .llm
                .chat_completion(
                    &self.config.model,
                    &messages,
                    Some(&tool_schemas),
                    self.config.max_tokens,
                )
                .await?;

            if let Some(usage) = &response.usage {
                tracing::debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "token usage"
                );
            }

            let message = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("API returned no choices"))?
                .message;

            // Check for tool calls
            if let Some(tool_calls) = &message.tool_calls {
                if !tool_calls.is_empty() {
                    let tool_calls = tool_calls.clone();

                    // Add assistant message with tool calls
                    messages.push(message.into_chat_message());

                    // Execute each tool call sequentially, in request order
                    for tool_call in &tool_calls {
                        let result = self.execute_tool_call(tool_call).await;
                        messages.push(ChatMessage::tool(result.to_string(), tool_call.id.as_str()));
                    }

                    continue;
                }
            }

            // No tool calls - this is the final response
            if let Some(content) = message.content {
                return Ok(content);
            }

            // Empty response - shouldn't happen but handle gracefully
            return Err(anyhow::anyhow!("API returned empty response"));
        }

        Err(anyhow::anyhow!(
            "tool-call budget exceeded after {} rounds",
            self.config.max_tool_rounds
        ))
    }

    /// Execute a single tool call and return its result envelope.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> serde_json::Value {
        tracing::info!(
            tool = %tool_call.function.name,
            args = %tool_call.function.arguments,
            "tool call requested"
        );

        // Malformed argument JSON is a local failure: it becomes an error
        // envelope the model can react to, never a crash.
        let args: serde_json::Value = match serde_json::from_str(&tool_call.function.arguments) {
            Ok(value) => value,
            Err(e) => {
                return json!({
                    "error": format!("invalid arguments: {}", e),
                    "success": false,
                });
            }
        };

        self.tools.execute(&tool_call.function.name, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{
        ChatResponse, Choice, FunctionCall, LlmError, ResponseMessage, ToolSchema,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted completion client: returns canned responses in order and
    /// records the message history it was called with.
    struct MockClient {
        responses: Mutex<Vec<ChatResponse>>,
        histories: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl MockClient {
        fn new(responses: Vec<ChatResponse>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                histories: Mutex::new(Vec::new()),
            }
        }

        fn histories(&self) -> Vec<Vec<ChatMessage>> {
            self.histories.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockClient {
        async fn chat_completion(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            tools: Option<&[ToolSchema]>,
            _max_tokens: u32,
        ) -> Result<ChatResponse, LlmError> {
            assert!(tools.is_some_and(|t| t.len() == 3), "tool list must be supplied");
            self.histories.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or(LlmError::EmptyResponse)
        }
    }

    fn text_response(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content.to_string()),
                    tool_calls: None,
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        }
    }

    fn tool_call_response(calls: Vec<(&str, &str, &str)>) -> ChatResponse {
        let tool_calls = calls
            .into_iter()
            .map(|(id, name, arguments)| ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            })
            .collect();
        ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: None,
                    tool_calls: Some(tool_calls),
                },
                finish_reason: Some("tool_calls".to_string()),
            }],
            usage: None,
        }
    }

    fn agent_with(responses: Vec<ChatResponse>) -> (Agent, Arc<MockClient>) {
        let client = Arc::new(MockClient::new(responses));
        let config = Config::new(
            "http://localhost:3000/v1".to_string(),
            "any-key".to_string(),
            "custom-claude-4-sonnet".to_string(),
        );
        (Agent::with_client(config, client.clone()), client)
    }

    #[tokio::test]
    async fn calculate_round_trip() {
        let (agent, client) = agent_with(vec![
            tool_call_response(vec![(
                "call_1",
                "mcp__gateway__calculate",
                "{\"expression\": \"123 * 456 + 789\"}",
            )]),
            text_response("The answer is 56877."),
        ]);

        let answer = agent.run("计算 123 * 456 + 789").await.unwrap();
        assert_eq!(answer, "The answer is 56877.");

        // The second API call must see user, assistant, tool - in order -
        // with the tool result carrying the computed value and the
        // correlation id of the request.
        let histories = client.histories();
        assert_eq!(histories.len(), 2);
        let second = &histories[1];
        assert_eq!(second.len(), 3);
        assert_eq!(second[0].role, crate::llm::Role::User);
        assert_eq!(second[1].role, crate::llm::Role::Assistant);
        assert_eq!(second[2].role, crate::llm::Role::Tool);
        assert_eq!(second[2].tool_call_id.as_deref(), Some("call_1"));

        let envelope: serde_json::Value =
            serde_json::from_str(second[2].content.as_deref().unwrap()).unwrap();
        assert_eq!(envelope["result"], 56877);
        assert_eq!(envelope["success"], true);
    }

    #[tokio::test]
    async fn two_tool_calls_append_results_in_request_order() {
        let (agent, client) = agent_with(vec![
            tool_call_response(vec![
                (
                    "call_bj",
                    "mcp__gateway__get_weather",
                    "{\"location\": \"北京\"}",
                ),
                (
                    "call_sh",
                    "mcp__gateway__get_weather",
                    "{\"location\": \"上海\"}",
                ),
            ]),
            text_response("Both cities look pleasant."),
        ]);

        let answer = agent.run("北京和上海的天气怎么样？").await.unwrap();
        assert_eq!(answer, "Both cities look pleasant.");

        let second = &client.histories()[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].tool_call_id.as_deref(), Some("call_bj"));
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_sh"));

        let first_result: serde_json::Value =
            serde_json::from_str(second[2].content.as_deref().unwrap()).unwrap();
        assert_eq!(first_result["location"], "北京");
    }

    #[tokio::test]
    async fn tool_error_envelope_does_not_abort_the_loop() {
        let (agent, client) = agent_with(vec![
            tool_call_response(vec![(
                "call_1",
                "mcp__gateway__calculate",
                "{\"expression\": \"1/0\"}",
            )]),
            text_response("That division is undefined."),
        ]);

        let answer = agent.run("计算 1/0").await.unwrap();
        assert_eq!(answer, "That division is undefined.");

        let envelope: serde_json::Value = serde_json::from_str(
            client.histories()[1][2].content.as_deref().unwrap(),
        )
        .unwrap();
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["error"], "division by zero");
    }

    #[tokio::test]
    async fn malformed_arguments_become_an_error_envelope() {
        let (agent, client) = agent_with(vec![
            tool_call_response(vec![(
                "call_1",
                "mcp__gateway__calculate",
                "{not json",
            )]),
            text_response("done"),
        ]);

        agent.run("calculate something").await.unwrap();

        let envelope: serde_json::Value = serde_json::from_str(
            client.histories()[1][2].content.as_deref().unwrap(),
        )
        .unwrap();
        assert_eq!(envelope["success"], false);
        assert!(envelope["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid arguments"));
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_not_fatal() {
        let (agent, client) = agent_with(vec![
            tool_call_response(vec![("call_1", "mcp__gateway__send_email", "{}")]),
            text_response("I cannot send email."),
        ]);

        let answer = agent.run("email my boss").await.unwrap();
        assert_eq!(answer, "I cannot send email.");

        let envelope: serde_json::Value = serde_json::from_str(
            client.histories()[1][2].content.as_deref().unwrap(),
        )
        .unwrap();
        assert_eq!(envelope["error"], "unknown tool: send_email");
    }

    #[tokio::test]
    async fn response_without_tool_calls_returns_immediately() {
        let (agent, client) = agent_with(vec![text_response("Hello!")]);

        let answer = agent.run("hi").await.unwrap();
        assert_eq!(answer, "Hello!");
        assert_eq!(client.histories().len(), 1);
    }

    #[tokio::test]
    async fn tool_round_budget_is_enforced() {
        // A model that keeps requesting tools forever.
        let responses: Vec<ChatResponse> = (0..20)
            .map(|_| {
                tool_call_response(vec![(
                    "call_n",
                    "mcp__gateway__search",
                    "{\"query\": \"more\"}",
                )])
            })
            .collect();
        let (agent, client) = agent_with(responses);

        let err = agent.run("search forever").await.unwrap_err();
        assert!(err.to_string().contains("tool-call budget exceeded"));
        assert_eq!(client.histories().len(), 8);
    }

    #[tokio::test]
    async fn transport_error_aborts_the_turn() {
        let (agent, _client) = agent_with(vec![]);

        let err = agent.run("hi").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
