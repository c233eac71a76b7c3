//! LLM provider boundary.
//!
//! One operation: given a message history and a set of tool schemas, return
//! either a tool-call request or a final text message. The provider is an
//! opaque collaborator behind the [`LlmClient`] trait so tests can script it.

mod client;
mod types;

pub use client::{LlmClient, OpenRouterClient};
pub use types::{ChatMessage, FunctionCall, FunctionDefinition, Role, ToolCall, ToolDefinition};
