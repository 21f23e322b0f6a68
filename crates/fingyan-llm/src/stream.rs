//! Streaming completion types
//!
//! A streaming completion yields text deltas as the model generates them,
//! then a terminal [`StreamDelta::Done`] carrying the fully-accumulated
//! response (including any tool calls). Callers forward the deltas live and
//! continue the agent loop from the final message.

use crate::{CompletionResponse, Result};
use futures::Stream;
use std::pin::Pin;

/// One item in a streaming completion
#[derive(Debug, Clone)]
pub enum StreamDelta {
    /// A fragment of assistant text
    TextDelta(String),

    /// Terminal item: the complete response, tool calls included
    Done(CompletionResponse),
}

/// Boxed stream of completion deltas
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamDelta>> + Send>>;
