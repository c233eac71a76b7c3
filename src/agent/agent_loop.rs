//! Core conversation loop implementation.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result, Service};
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// Message history for one chat session.
///
/// Owned by exactly one caller and passed explicitly into every turn, so
/// concurrent sessions never share state. Held in memory only; discarded
/// with the session.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The conversational agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    model: String,
    max_tool_iterations: usize,
}

impl Agent {
    /// Create a new agent with the given LLM client and tool registry.
    pub fn new(config: &Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            model: config.model.clone(),
            max_tool_iterations: config.max_tool_iterations,
        }
    }

    /// Run one conversation turn: append the user's message, let the model
    /// call tools until it produces a text answer, and return that answer.
    ///
    /// Tool failures do not abort the turn; the error text is fed back to the
    /// model as the tool result so it can retry with different arguments or
    /// explain the problem. The turn itself fails only when the provider is
    /// unreachable or the model is still requesting tools at the iteration
    /// cap ([`Error::BoundExceeded`]).
    pub async fn run_turn(&self, session: &mut ChatSession, user_text: &str) -> Result<String> {
        if session.messages.is_empty() {
            session
                .messages
                .push(ChatMessage::system(build_system_prompt(&self.tools)));
        }
        session.messages.push(ChatMessage::user(user_text));

        let tool_schemas = self.tools.tool_schemas();

        for iteration in 0..self.max_tool_iterations {
            tracing::debug!("conversation iteration {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(&self.model, &session.messages, Some(&tool_schemas))
                .await?;

            if let Some(tool_calls) = response.tool_calls.clone().filter(|c| !c.is_empty()) {
                session.messages.push(response);

                // Execute every requested call sequentially, preserving the
                // model's order so it can correlate call and result.
                for call in &tool_calls {
                    tracing::info!(
                        tool = %call.function.name,
                        args = %call.function.arguments,
                        "executing tool call"
                    );

                    let payload = match self.execute_tool_call(call).await {
                        Ok(output) => output,
                        Err(e) => format!("Error: {}", e),
                    };

                    session
                        .messages
                        .push(ChatMessage::tool_result(&call.id, payload));
                }

                continue;
            }

            // No tool calls: this is the final answer.
            if let Some(content) = response.content.clone() {
                session.messages.push(response);
                return Ok(content);
            }

            return Err(Error::MalformedResponse {
                service: Service::Llm,
                detail: "assistant message had neither content nor tool calls".to_string(),
            });
        }

        Err(Error::BoundExceeded {
            limit: self.max_tool_iterations,
        })
    }

    async fn execute_tool_call(&self, call: &ToolCall) -> anyhow::Result<String> {
        let args: Value = serde_json::from_str(&call.function.arguments)
            .map_err(|e| anyhow::anyhow!("invalid tool arguments: {}", e))?;

        self.tools.execute(&call.function.name, args).await
    }
}
