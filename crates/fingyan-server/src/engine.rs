//! Chat engine: the model / tool loop behind every conversation
//!
//! The engine drives one assistant turn:
//! 1. Stream a completion from the model with the tool catalog attached
//! 2. Forward text deltas to the client as they arrive
//! 3. If the model requested tools, execute them, announce each call and
//!    its result on the stream, append the results to the conversation
//!    and loop back
//! 4. When the model stops on its own, emit a final `finish` event

use crate::events::ChatEvent;
use fingyan_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, StreamDelta, ToolDefinition,
};
use fingyan_tools::ToolRegistry;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 64;

/// Configuration for the chat engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model to request completions from
    pub model: String,

    /// System prompt prepended to every conversation
    pub system_prompt: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum model / tool round trips per turn
    pub max_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-5-mini".to_string(),
            system_prompt: crate::config::SYSTEM_PROMPT.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_iterations: 10,
        }
    }
}

/// Runs conversations against an LLM provider and a tool registry
pub struct ChatEngine {
    provider: Arc<dyn LLMProvider>,
    registry: Arc<ToolRegistry>,
    config: EngineConfig,
}

impl ChatEngine {
    /// Create a new engine
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        registry: Arc<ToolRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            config,
        }
    }

    /// Run one assistant turn over the given conversation
    ///
    /// Returns immediately with a stream of [`ChatEvent`]s; the loop runs
    /// in a background task and stops early if the client hangs up.
    pub fn stream(&self, messages: Vec<Message>) -> ReceiverStream<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let provider = Arc::clone(&self.provider);
        let registry = Arc::clone(&self.registry);
        let config = self.config.clone();

        tokio::spawn(async move {
            run_turn(provider, registry, config, messages, tx).await;
        });

        ReceiverStream::new(rx)
    }
}

async fn run_turn(
    provider: Arc<dyn LLMProvider>,
    registry: Arc<ToolRegistry>,
    config: EngineConfig,
    mut conversation: Vec<Message>,
    tx: mpsc::Sender<ChatEvent>,
) {
    for iteration in 1..=config.max_iterations {
        debug!(iteration, model = %config.model, "requesting completion");

        let tools = tool_definitions(&registry);
        let mut builder = CompletionRequest::builder(&config.model)
            .messages(conversation.clone())
            .system(config.system_prompt.clone())
            .max_tokens(config.max_tokens)
            .temperature(config.temperature);
        if !tools.is_empty() {
            builder = builder.tools(tools);
        }

        let mut stream = match provider.complete_stream(builder.build()).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "completion request failed");
                let _ = tx
                    .send(ChatEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        let mut response = None;
        while let Some(delta) = stream.next().await {
            match delta {
                Ok(StreamDelta::TextDelta(delta)) => {
                    if tx.send(ChatEvent::TextDelta { delta }).await.is_err() {
                        debug!("client disconnected, abandoning turn");
                        return;
                    }
                }
                Ok(StreamDelta::Done(completed)) => {
                    response = Some(completed);
                }
                Err(e) => {
                    warn!(error = %e, "completion stream failed");
                    let _ = tx
                        .send(ChatEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
            }
        }

        let Some(response) = response else {
            let _ = tx
                .send(ChatEvent::Error {
                    message: "completion stream ended without a final response".to_string(),
                })
                .await;
            return;
        };

        info!(
            iteration,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );
        conversation.push(response.message.clone());

        match response.stop_reason {
            StopReason::EndTurn => {
                let _ = tx
                    .send(ChatEvent::Finish {
                        usage: response.usage,
                    })
                    .await;
                return;
            }
            StopReason::MaxTokens => {
                warn!("completion truncated at the token limit");
                let _ = tx
                    .send(ChatEvent::Finish {
                        usage: response.usage,
                    })
                    .await;
                return;
            }
            StopReason::ToolUse => {
                if !execute_tools(&registry, &response.message, &mut conversation, &tx).await {
                    return;
                }
            }
        }
    }

    warn!(
        max_iterations = config.max_iterations,
        "turn exceeded the tool round-trip limit"
    );
    let _ = tx
        .send(ChatEvent::Error {
            message: "the assistant made too many tool calls without finishing".to_string(),
        })
        .await;
}

/// Execute every tool call in the assistant message, streaming events and
/// appending results to the conversation. Returns false if the client
/// disconnected.
async fn execute_tools(
    registry: &ToolRegistry,
    message: &Message,
    conversation: &mut Vec<Message>,
    tx: &mpsc::Sender<ChatEvent>,
) -> bool {
    for block in message.tool_uses() {
        let ContentBlock::ToolUse { id, name, input } = block else {
            continue;
        };

        info!(tool = %name, call_id = %id, "executing tool");
        let announced = tx
            .send(ChatEvent::ToolInputAvailable {
                tool_call_id: id.clone(),
                tool_name: name.clone(),
                input: input.clone(),
            })
            .await;
        if announced.is_err() {
            return false;
        }

        let started = std::time::Instant::now();
        match registry.execute(name, input.clone()).await {
            Ok(output) => {
                debug!(
                    tool = %name,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "tool call succeeded"
                );
                let serialized = serde_json::to_string(&output)
                    .unwrap_or_else(|_| output.to_string());
                let sent = tx
                    .send(ChatEvent::ToolOutputAvailable {
                        tool_call_id: id.clone(),
                        tool_name: name.clone(),
                        output,
                    })
                    .await;
                if sent.is_err() {
                    return false;
                }
                conversation.push(Message::tool_result(id.clone(), serialized));
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "tool call failed");
                let sent = tx
                    .send(ChatEvent::ToolOutputError {
                        tool_call_id: id.clone(),
                        tool_name: name.clone(),
                        error_text: e.to_string(),
                    })
                    .await;
                if sent.is_err() {
                    return false;
                }
                // The model sees the failure and can retry or apologize
                conversation.push(Message::tool_error(id.clone(), format!("Error: {e}")));
            }
        }
    }

    true
}

fn tool_definitions(registry: &ToolRegistry) -> Vec<ToolDefinition> {
    registry
        .list_tools()
        .iter()
        .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
        .collect()
}
