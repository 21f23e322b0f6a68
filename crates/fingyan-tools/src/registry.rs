//! Tool registry for the fixed set of tools offered to the model

use crate::{Result, Tool, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry mapping tool names to implementations
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.get(name).cloned()
    }

    /// Execute a named tool, resolving it from the registry
    pub async fn execute(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.execute(params).await
    }

    /// List all registered tools
    ///
    /// Used to build the tool definitions sent to the model.
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.values().cloned().collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());

        let out = registry.execute("echo", json!({"x": 1})).await.expect("echo");
        assert_eq!(out, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
