//! # Gateway Agent
//!
//! A minimal tool-calling agent for OpenAI-compatible chat gateways.
//!
//! This library provides:
//! - Wire types and a client for the chat-completion API
//! - A registry of locally executed (mock) tools
//! - An agent loop that alternates between the API and tool execution
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Start the conversation with the user message
//! 2. Call the completion API with the full history and tool declarations
//! 3. Execute any requested tool calls, feed results back
//! 4. Repeat until the API returns a response without tool calls
//!
//! ## Example
//!
//! ```rust,ignore
//! use gateway_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let answer = agent.run("计算 123 * 456 + 789").await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
