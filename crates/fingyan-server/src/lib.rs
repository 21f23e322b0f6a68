//! HTTP chat server for the FinGyan assistant
//!
//! Exposes a single streaming chat endpoint. Each request carries the
//! conversation so far; the response is a server-sent event stream of
//! [`ChatEvent`]s produced by the [`engine::ChatEngine`], which loops
//! between the model and the finance tool registry until the turn ends.

pub mod config;
pub mod engine;
pub mod events;
pub mod routes;
pub mod server;

pub use config::{SYSTEM_PROMPT, ServerConfig};
pub use engine::{ChatEngine, EngineConfig};
pub use events::ChatEvent;
pub use server::{router, serve};
