//! Chat-completion API boundary.
//!
//! Wire types for the OpenAI-compatible protocol plus the [`LlmClient`]
//! trait the agent loop talks to. The transport is opaque to the rest of
//! the crate; the loop only consumes the request/response contract.

mod client;
mod types;

pub use client::{GatewayClient, LlmClient, LlmError};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, FunctionCall, FunctionSchema,
    ResponseMessage, Role, ToolCall, ToolSchema, Usage,
};
