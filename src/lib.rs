//! # pitwall
//!
//! A conversational assistant for Formula 1 data. Natural-language questions
//! are translated into calls against the openF1 API by an LLM through
//! function calling, and the results are synthesized back into an answer.
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a question via the CLI REPL or the HTTP chat API
//! 2. Build context with the system prompt and the three F1 tool schemas
//! 3. Call the LLM; execute any requested tool calls against openF1
//! 4. Feed results back, repeat until the model answers in text (bounded
//!    by an iteration cap)
//!
//! Every data fetch is a stateless pass-through to openF1; nothing is
//! cached or persisted, and session histories live in memory only.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pitwall::{build_agent, config::Config, agent::ChatSession};
//!
//! let config = Config::from_env()?;
//! let agent = build_agent(&config);
//! let mut session = ChatSession::new();
//! let answer = agent.run_turn(&mut session, "Who won qualifying in Bahrain?").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod openf1;
pub mod tools;

use std::sync::Arc;

pub use config::Config;
pub use error::{Error, Result};

use agent::Agent;
use llm::OpenRouterClient;
use openf1::OpenF1Client;

/// Wire up the production agent: OpenRouter for the model, openF1 for data.
pub fn build_agent(config: &Config) -> Agent {
    let llm = Arc::new(OpenRouterClient::new(config));
    let data = Arc::new(OpenF1Client::new(config));
    let tools = tools::f1::f1_registry(data);
    Agent::new(config, llm, tools)
}
