//! Tool registry: the functions the model may call, with their schemas.
//!
//! The model picks tools from the descriptions alone, so the wording in each
//! [`Tool::description`] and parameter schema is a correctness surface, not
//! documentation.

pub mod f1;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::ToolDefinition;

/// A function callable by the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to invoke this tool.
    fn name(&self) -> &str;

    /// One-sentence purpose, shown to the model for tool selection.
    fn description(&self) -> &str;

    /// JSON Schema for the arguments object.
    fn parameters_schema(&self) -> Value;

    /// Execute with parsed arguments, returning text for the model.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Holds the registered tools and dispatches execution by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Schema list sent verbatim with every model request, in registration
    /// order.
    pub fn tool_schemas(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| {
                ToolDefinition::function(t.name(), t.description(), t.parameters_schema())
            })
            .collect()
    }

    pub fn list_tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.execute(args).await
    }
}
