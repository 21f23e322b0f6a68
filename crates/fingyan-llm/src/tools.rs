//! Tool definition types for LLM tool use

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for an LLM provider
///
/// Describes a callable tool: its name, a description the model uses to
/// decide when to call it, and an input schema in JSON Schema format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the tool in the registry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_creation() {
        let schema = json!({
            "type": "object",
            "properties": {
                "symbol": { "type": "string", "description": "Stock ticker symbol" }
            },
            "required": ["symbol"]
        });

        let tool = ToolDefinition::new("stock_price", "Get the current price", schema.clone());
        assert_eq!(tool.name, "stock_price");
        assert_eq!(tool.input_schema, schema);
    }
}
