//! LLM provider abstraction layer for fingyan
//!
//! Provider-agnostic types for chat completions with tool calling:
//!
//! - Message types for the conversation history
//! - Completion request/response types
//! - Tool definitions for function calling
//! - A [`LLMProvider`] trait with blocking and streaming completion
//! - An OpenAI-compatible provider implementation

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use stream::{CompletionStream, StreamDelta};
pub use tools::ToolDefinition;
