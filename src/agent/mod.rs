//! Agent module - the conversation loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and the user's question
//! 2. Call the LLM with the F1 tool schemas
//! 3. If the LLM requests tool calls, execute them in order and feed the
//!    results back
//! 4. Repeat until the LLM produces a final text answer, or fail closed when
//!    the iteration cap is hit

mod agent_loop;
mod prompt;

pub use agent_loop::{Agent, ChatSession};
pub use prompt::build_system_prompt;
