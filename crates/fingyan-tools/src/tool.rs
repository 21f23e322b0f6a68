//! Tool trait definition

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools the language model can call
///
/// Each tool declares a unique name, a description the model uses to decide
/// when to call it, and a JSON Schema for its input. Data-fetching tools in
/// this workspace follow a degraded-output contract: a failed fetch returns
/// `Ok` with a payload carrying an `"error"` string field rather than an
/// `Err`, so the rendering layer always has something to display.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the given input
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as a JSON value matching `input_schema`
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a [`crate::ToolRegistry`].
    fn name(&self) -> &str;

    /// Get the tool's description, shown to the model
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
