//! Wire events streamed to the chat client
//!
//! Each server-sent event carries one JSON-encoded [`ChatEvent`]. The
//! `type` tag tells the client whether to append text, render a tool
//! widget, or close the stream.

use fingyan_llm::TokenUsage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event in the chat response stream
///
/// Every stream ends with exactly one `Finish` or `Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ChatEvent {
    /// A fragment of assistant text
    TextDelta { delta: String },

    /// The model decided to call a tool with these arguments
    ToolInputAvailable {
        tool_call_id: String,
        tool_name: String,
        input: Value,
    },

    /// A tool call produced output (possibly a degraded payload with an
    /// `error` field, which the client renders as a fallback card)
    ToolOutputAvailable {
        tool_call_id: String,
        tool_name: String,
        output: Value,
    },

    /// A tool call failed outright, e.g. invalid arguments
    ToolOutputError {
        tool_call_id: String,
        tool_name: String,
        error_text: String,
    },

    /// The assistant finished its turn
    Finish { usage: TokenUsage },

    /// The stream aborted before the turn could finish
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_delta_wire_format() {
        let event = ChatEvent::TextDelta {
            delta: "Hello".to_string(),
        };
        let wire = serde_json::to_value(&event).expect("serialize");
        assert_eq!(wire, json!({ "type": "text-delta", "delta": "Hello" }));
    }

    #[test]
    fn test_tool_events_use_camel_case_fields() {
        let event = ChatEvent::ToolInputAvailable {
            tool_call_id: "call_1".to_string(),
            tool_name: "stock_price".to_string(),
            input: json!({ "symbol": "AAPL" }),
        };
        let wire = serde_json::to_value(&event).expect("serialize");
        assert_eq!(wire["type"], "tool-input-available");
        assert_eq!(wire["toolCallId"], "call_1");
        assert_eq!(wire["toolName"], "stock_price");
        assert_eq!(wire["input"]["symbol"], "AAPL");

        let event = ChatEvent::ToolOutputError {
            tool_call_id: "call_2".to_string(),
            tool_name: "market_movers".to_string(),
            error_text: "type must be 'biggest-gainers' or 'biggest-losers'".to_string(),
        };
        let wire = serde_json::to_value(&event).expect("serialize");
        assert_eq!(wire["type"], "tool-output-error");
        assert!(wire["errorText"].as_str().expect("str").contains("gainers"));
    }

    #[test]
    fn test_finish_round_trips() {
        let event = ChatEvent::Finish {
            usage: TokenUsage {
                input_tokens: 12,
                output_tokens: 34,
            },
        };
        let wire = serde_json::to_string(&event).expect("serialize");
        let back: ChatEvent = serde_json::from_str(&wire).expect("deserialize");
        assert_eq!(back, event);
    }
}
