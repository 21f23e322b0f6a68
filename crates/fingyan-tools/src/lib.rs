//! Tool abstractions for fingyan
//!
//! A [`Tool`] is a named async function with a JSON Schema input contract
//! that a language model can invoke through tool calling. The
//! [`ToolRegistry`] holds the fixed set of tools offered to the model and
//! resolves tool calls by name at execution time.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use error::Result as ToolResult;
pub use registry::ToolRegistry;
pub use tool::Tool;
