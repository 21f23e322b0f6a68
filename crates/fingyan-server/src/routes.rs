//! HTTP handlers for the chat API

use crate::engine::ChatEngine;
use crate::events::ChatEvent;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::StreamExt;
use fingyan_llm::Message;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Shared state behind every handler
pub struct AppState {
    pub engine: ChatEngine,
}

/// A chat request: the full conversation so far
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<IncomingMessage>,
}

/// One message from the client's transcript
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

impl IncomingMessage {
    fn into_message(self) -> Result<Message, (StatusCode, Json<Value>)> {
        match self.role.as_str() {
            "user" => Ok(Message::user(self.content)),
            "assistant" => Ok(Message::assistant(self.content)),
            "system" => Ok(Message::system(self.content)),
            other => Err(bad_request(format!("unknown message role '{other}'"))),
        }
    }
}

fn bad_request(message: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// POST /api/chat
///
/// Validates the transcript and streams [`ChatEvent`]s back as
/// server-sent events, one JSON event per SSE message.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, (StatusCode, Json<Value>)> {
    if request.messages.is_empty() {
        return Err(bad_request("messages must not be empty".to_string()));
    }

    let messages = request
        .messages
        .into_iter()
        .map(IncomingMessage::into_message)
        .collect::<Result<Vec<_>, _>>()?;

    let request_id = Uuid::new_v4();
    info!(%request_id, message_count = messages.len(), "chat request accepted");

    let stream = state
        .engine
        .stream(messages)
        .map(|event: ChatEvent| Event::default().json_data(&event));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
