//! Agent module - the tool-call orchestration loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Start the conversation with the user message
//! 2. Call the completion API with the history and available tools
//! 3. If the API requests tool calls, execute them and feed results back
//! 4. Repeat until the API answers without tool calls or the round budget
//!    is exhausted

mod agent_loop;

pub use agent_loop::Agent;
