//! OpenAI-compatible provider implementation
//!
//! Implements the [`LLMProvider`] trait against the chat-completions API.
//! See: https://platform.openai.com/docs/api-reference/chat
//!
//! Works against any OpenAI-compatible endpoint (Azure deployments, local
//! llama.cpp/vLLM servers) through a custom `api_base`.

use crate::{
    CompletionRequest, CompletionResponse, CompletionStream, ContentBlock, LLMError, LLMProvider,
    Message, MessageContent, Result, Role, StopReason, StreamDelta, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument, warn};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment
    ///
    /// Reads the API key from `OPENAI_API_KEY` and, if set, the base URL
    /// from `OPENAI_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            LLMError::ConfigurationError("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE.to_string());

        Ok(Self {
            api_key,
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI-compatible chat-completions provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    async fn send_request(&self, body: &OpenAIRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            let model = body.model.clone();

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to {}", self.config.api_base);

        let body = build_request(&request, false);
        let response = self.send_request(&body).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        debug!(
            stop_reason = %choice.finish_reason,
            input_tokens = openai_response.usage.prompt_tokens,
            output_tokens = openai_response.usage.completion_tokens,
            "Response received"
        );

        let message = parse_response_message(choice.message.content, choice.message.tool_calls)?;

        Ok(CompletionResponse {
            message,
            stop_reason: map_stop_reason(&choice.finish_reason),
            usage: TokenUsage {
                input_tokens: openai_response.usage.prompt_tokens,
                output_tokens: openai_response.usage.completion_tokens,
            },
        })
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete_stream(&self, request: CompletionRequest) -> Result<CompletionStream> {
        debug!("Opening completion stream to {}", self.config.api_base);

        let body = build_request(&request, true);
        let response = self.send_request(&body).await?;

        let (tx, rx) = tokio::sync::mpsc::channel::<Result<StreamDelta>>(64);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut acc = StreamAccumulator::default();
            let mut done = false;

            'outer: while let Some(chunk) = byte_stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(Err(LLMError::HttpError(e))).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Frames are "data: {json}" lines separated by blank lines
                while let Some(frame_end) = buffer.find("\n\n") {
                    let frame = buffer[..frame_end].to_string();
                    buffer.drain(..frame_end + 2);

                    for line in frame.lines() {
                        let Some(data) = line.strip_prefix("data: ") else {
                            continue;
                        };

                        if data.trim() == "[DONE]" {
                            done = true;
                            break 'outer;
                        }

                        match serde_json::from_str::<StreamChunk>(data) {
                            Ok(chunk) => {
                                if let Some(delta) = acc.apply(chunk) {
                                    if tx.send(Ok(StreamDelta::TextDelta(delta))).await.is_err() {
                                        return;
                                    }
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Skipping unparseable stream chunk");
                            }
                        }
                    }
                }
            }

            let result = if done {
                acc.finish()
            } else {
                Err(LLMError::StreamInterrupted(
                    "stream closed before [DONE]".to_string(),
                ))
            };
            let _ = tx.send(result.map(StreamDelta::Done)).await;
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAITool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIFunction,
}

#[derive(Debug, Serialize)]
struct OpenAIFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIFunctionCall,
}

#[derive(Debug, Serialize)]
struct OpenAIFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: OpenAIUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseToolCall {
    id: String,
    function: OpenAIResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// Streaming chunk types: deltas arrive per-choice, tool-call arguments as
// string fragments keyed by index.

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: MessageDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageDelta {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    index: usize,
    id: Option<String>,
    function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct FunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}

// ============================================================================
// Stream accumulation
// ============================================================================

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates stream chunks into a final [`CompletionResponse`]
#[derive(Debug, Default)]
struct StreamAccumulator {
    text: String,
    tool_calls: Vec<PartialToolCall>,
    finish_reason: Option<String>,
    usage: Option<OpenAIUsage>,
}

impl StreamAccumulator {
    /// Fold in one chunk; returns the text delta to forward, if any
    fn apply(&mut self, chunk: StreamChunk) -> Option<String> {
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }

        let choice = chunk.choices.into_iter().next()?;

        if let Some(reason) = choice.finish_reason {
            self.finish_reason = Some(reason);
        }

        if let Some(calls) = choice.delta.tool_calls {
            for call in calls {
                while self.tool_calls.len() <= call.index {
                    self.tool_calls.push(PartialToolCall::default());
                }
                let slot = &mut self.tool_calls[call.index];
                if let Some(id) = call.id {
                    slot.id = id;
                }
                if let Some(function) = call.function {
                    if let Some(name) = function.name {
                        slot.name = name;
                    }
                    if let Some(fragment) = function.arguments {
                        slot.arguments.push_str(&fragment);
                    }
                }
            }
        }

        match choice.delta.content {
            Some(text) if !text.is_empty() => {
                self.text.push_str(&text);
                Some(text)
            }
            _ => None,
        }
    }

    /// Build the final response once the stream terminates
    fn finish(self) -> Result<CompletionResponse> {
        let mut blocks = Vec::new();

        if !self.text.is_empty() {
            blocks.push(ContentBlock::Text { text: self.text });
        }

        for call in self.tool_calls {
            let input: serde_json::Value = if call.arguments.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&call.arguments).map_err(|e| {
                    LLMError::UnexpectedResponse(format!("Failed to parse tool arguments: {e}"))
                })?
            };

            blocks.push(ContentBlock::ToolUse {
                id: call.id,
                name: call.name,
                input,
            });
        }

        if blocks.is_empty() {
            blocks.push(ContentBlock::Text {
                text: String::new(),
            });
        }

        let finish_reason = self.finish_reason.unwrap_or_else(|| "stop".to_string());
        let usage = self.usage.unwrap_or_default();

        Ok(CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(blocks)),
            },
            stop_reason: map_stop_reason(&finish_reason),
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

// ============================================================================
// Conversion functions
// ============================================================================

fn build_request(request: &CompletionRequest, stream: bool) -> OpenAIRequest {
    OpenAIRequest {
        model: request.model.clone(),
        messages: build_openai_messages(request.system.clone(), request.messages.clone()),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        tools: request.tools.as_deref().map(convert_tools),
        stream: stream.then_some(true),
        stream_options: stream.then_some(StreamOptions {
            include_usage: true,
        }),
    }
}

/// Build OpenAI messages from our generic format
///
/// The system prompt goes into the messages array for this API.
fn build_openai_messages(system: Option<String>, messages: Vec<Message>) -> Vec<OpenAIMessage> {
    let mut result = Vec::new();

    if let Some(sys) = system {
        result.push(OpenAIMessage {
            role: "system".to_string(),
            content: Some(sys),
            tool_calls: None,
            tool_call_id: None,
        });
    }

    for msg in messages {
        result.extend(convert_message(msg));
    }

    result
}

/// Convert a single message to the wire format
///
/// One message may become multiple wire messages: each tool result becomes
/// a separate message with role="tool".
fn convert_message(msg: Message) -> Vec<OpenAIMessage> {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    };

    match msg.content {
        Some(MessageContent::Text(text)) => vec![OpenAIMessage {
            role: role.to_string(),
            content: Some(text),
            tool_calls: None,
            tool_call_id: None,
        }],
        Some(MessageContent::Blocks(blocks)) => convert_blocks(role, blocks),
        None => vec![OpenAIMessage {
            role: role.to_string(),
            content: Some(String::new()),
            tool_calls: None,
            tool_call_id: None,
        }],
    }
}

fn convert_blocks(role: &str, blocks: Vec<ContentBlock>) -> Vec<OpenAIMessage> {
    let mut messages = Vec::new();
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { text: t } => {
                text.push_str(&t);
            }
            ContentBlock::ToolUse { id, name, input } => {
                let arguments = serde_json::to_string(&input).unwrap_or_default();
                tool_calls.push(OpenAIToolCall {
                    id,
                    tool_type: "function".to_string(),
                    function: OpenAIFunctionCall { name, arguments },
                });
            }
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                ..
            } => {
                messages.push(OpenAIMessage {
                    role: "tool".to_string(),
                    content: Some(content),
                    tool_calls: None,
                    tool_call_id: Some(tool_use_id),
                });
            }
        }
    }

    if !text.is_empty() || !tool_calls.is_empty() {
        messages.insert(
            0,
            OpenAIMessage {
                role: role.to_string(),
                content: if text.is_empty() { None } else { Some(text) },
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls)
                },
                tool_call_id: None,
            },
        );
    }

    messages
}

fn convert_tools(tools: &[ToolDefinition]) -> Vec<OpenAITool> {
    tools
        .iter()
        .map(|tool| OpenAITool {
            tool_type: "function".to_string(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        })
        .collect()
}

/// Parse a response message into our format
fn parse_response_message(
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIResponseToolCall>>,
) -> Result<Message> {
    let mut blocks = Vec::new();

    if let Some(content) = content {
        if !content.is_empty() {
            blocks.push(ContentBlock::Text { text: content });
        }
    }

    if let Some(tool_calls) = tool_calls {
        for call in tool_calls {
            let input: serde_json::Value = serde_json::from_str(&call.function.arguments)
                .map_err(|e| {
                    LLMError::UnexpectedResponse(format!("Failed to parse tool arguments: {e}"))
                })?;

            blocks.push(ContentBlock::ToolUse {
                id: call.id,
                name: call.function.name,
                input,
            });
        }
    }

    if blocks.is_empty() {
        blocks.push(ContentBlock::Text {
            text: String::new(),
        });
    }

    Ok(Message {
        role: Role::Assistant,
        content: Some(MessageContent::Blocks(blocks)),
    })
}

/// Map a wire finish reason to our stop reason
fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "length" => StopReason::MaxTokens,
        "tool_calls" => StopReason::ToolUse,
        "stop" | "content_filter" => StopReason::EndTurn,
        other => {
            debug!("Unknown finish reason: {}", other);
            StopReason::EndTurn
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new("test-key").expect("provider");
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.config().api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_custom_config() {
        let config = OpenAIConfig::new("test-key")
            .with_api_base("http://localhost:8000/v1")
            .with_timeout(60);

        let provider = OpenAIProvider::with_config(config).expect("provider");
        assert_eq!(provider.config().api_base, "http://localhost:8000/v1");
        assert_eq!(provider.config().timeout_secs, 60);
    }

    #[test]
    fn test_system_message_in_array() {
        let messages = build_openai_messages(Some("You are FinGyan".to_string()), vec![]);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content.as_deref(), Some("You are FinGyan"));
    }

    #[test]
    fn test_tool_result_conversion() {
        let msg = Message::tool_result("call_123".to_string(), "{\"price\":1.0}".to_string());
        let wire = convert_message(msg);

        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "tool");
        assert_eq!(wire[0].tool_call_id.as_deref(), Some("call_123"));
    }

    #[test]
    fn test_multiple_tool_results_become_separate_messages() {
        let msg = Message {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![
                ContentBlock::ToolResult {
                    tool_use_id: "call_1".to_string(),
                    content: "result 1".to_string(),
                    is_error: None,
                },
                ContentBlock::ToolResult {
                    tool_use_id: "call_2".to_string(),
                    content: "result 2".to_string(),
                    is_error: None,
                },
            ])),
        };

        let wire = convert_message(msg);
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_2"));
    }

    #[test]
    fn test_assistant_tool_call_conversion() {
        let msg = Message {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "stock_price".to_string(),
                input: json!({"symbol": "AAPL"}),
            }])),
        };

        let wire = convert_message(msg);
        assert_eq!(wire.len(), 1);
        let calls = wire[0].tool_calls.as_ref().expect("tool calls");
        assert_eq!(calls[0].function.name, "stock_price");
        assert!(calls[0].function.arguments.contains("AAPL"));
    }

    #[test]
    fn test_tool_definition_conversion() {
        let tool = ToolDefinition::new(
            "news",
            "Get latest headlines",
            json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        );

        let wire = convert_tools(&[tool]);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].tool_type, "function");
        assert_eq!(wire[0].function.name, "news");
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason("stop"), StopReason::EndTurn);
        assert_eq!(map_stop_reason("length"), StopReason::MaxTokens);
        assert_eq!(map_stop_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(map_stop_reason("content_filter"), StopReason::EndTurn);
        assert_eq!(map_stop_reason("other"), StopReason::EndTurn);
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let message = parse_response_message(
            Some("Let me check".to_string()),
            Some(vec![OpenAIResponseToolCall {
                id: "call_123".to_string(),
                function: OpenAIResponseFunctionCall {
                    name: "crypto_price".to_string(),
                    arguments: r#"{"symbol":"BTC"}"#.to_string(),
                },
            }]),
        )
        .expect("parse");

        assert_eq!(message.role, Role::Assistant);
        let uses = message.tool_uses();
        assert_eq!(uses.len(), 1);
        match uses[0] {
            ContentBlock::ToolUse { name, input, .. } => {
                assert_eq!(name, "crypto_price");
                assert_eq!(input["symbol"], "BTC");
            }
            _ => panic!("Expected tool use"),
        }
    }

    #[test]
    fn test_parse_response_bad_arguments() {
        let result = parse_response_message(
            None,
            Some(vec![OpenAIResponseToolCall {
                id: "call_1".to_string(),
                function: OpenAIResponseFunctionCall {
                    name: "stock_price".to_string(),
                    arguments: "not json".to_string(),
                },
            }]),
        );
        assert!(matches!(result, Err(LLMError::UnexpectedResponse(_))));
    }

    #[test]
    fn test_stream_accumulator_text() {
        let mut acc = StreamAccumulator::default();

        let chunk: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"Hello "},"finish_reason":null}]}"#,
        )
        .expect("chunk");
        assert_eq!(acc.apply(chunk), Some("Hello ".to_string()));

        let chunk: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"world"},"finish_reason":"stop"}]}"#,
        )
        .expect("chunk");
        assert_eq!(acc.apply(chunk), Some("world".to_string()));

        let response = acc.finish().expect("finish");
        assert_eq!(response.message.text(), Some("Hello world"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_stream_accumulator_tool_call_fragments() {
        let mut acc = StreamAccumulator::default();

        let chunks = [
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_9","function":{"name":"stock_price","arguments":""}}]},"finish_reason":null}]}"#,
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"sym"}}]},"finish_reason":null}]}"#,
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"bol\":\"NVDA\"}"}}]},"finish_reason":"tool_calls"}]}"#,
            r#"{"choices":[],"usage":{"prompt_tokens":12,"completion_tokens":7}}"#,
        ];

        for raw in chunks {
            let chunk: StreamChunk = serde_json::from_str(raw).expect("chunk");
            assert_eq!(acc.apply(chunk), None);
        }

        let response = acc.finish().expect("finish");
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 7);

        let uses = response.message.tool_uses();
        assert_eq!(uses.len(), 1);
        match uses[0] {
            ContentBlock::ToolUse { id, name, input } => {
                assert_eq!(id, "call_9");
                assert_eq!(name, "stock_price");
                assert_eq!(input["symbol"], "NVDA");
            }
            _ => panic!("Expected tool use"),
        }
    }

    #[test]
    fn test_stream_accumulator_empty_arguments() {
        let mut acc = StreamAccumulator::default();
        let chunk: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c","function":{"name":"crypto_sentiment","arguments":""}}]},"finish_reason":"tool_calls"}]}"#,
        )
        .expect("chunk");
        acc.apply(chunk);

        let response = acc.finish().expect("finish");
        match response.message.tool_uses()[0] {
            ContentBlock::ToolUse { input, .. } => assert_eq!(*input, json!({})),
            _ => panic!("Expected tool use"),
        }
    }
}
