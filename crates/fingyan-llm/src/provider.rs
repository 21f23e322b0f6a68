//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, CompletionStream, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations provide access to a chat-completion service with tool
/// calling. Both a blocking and a streaming completion are required; the
/// chat pipeline is streaming-first, but tests and one-shot callers use
/// `complete`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Generate a completion as a stream of deltas
    ///
    /// The stream yields [`crate::StreamDelta::TextDelta`] items as text is
    /// generated and terminates with a single [`crate::StreamDelta::Done`].
    async fn complete_stream(&self, request: CompletionRequest) -> Result<CompletionStream>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
