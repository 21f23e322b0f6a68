//! Server configuration, read from the environment

use std::env;
use std::net::SocketAddr;

/// Persona and tool-use guidance sent with every conversation
pub const SYSTEM_PROMPT: &str = "You are FinGyan, a friendly finance assistant. \
You help users with stock prices, crypto prices, price charts, financial news, \
market sentiment, currency conversion, company fundamentals and market movers. \
Use the available tools to fetch live data instead of guessing numbers. \
When a tool returns an error field, acknowledge that the data could not be \
fetched and answer with what you know. Keep answers short and conversational; \
the tool results are rendered as rich widgets, so do not repeat every number \
from them.";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_MODEL: &str = "gpt-5-mini";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,

    /// Model to request completions from
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum model / tool round trips per turn
    pub max_iterations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.parse().expect("default bind address"),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_iterations: 10,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// Reads `FINGYAN_BIND` and `OPENAI_MODEL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(bind) = env::var("FINGYAN_BIND") {
            config.bind = bind
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid FINGYAN_BIND '{bind}': {e}"))?;
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        Ok(config)
    }

    /// Engine settings derived from this config
    pub fn engine_config(&self) -> crate::engine::EngineConfig {
        crate::engine::EngineConfig {
            model: self.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            max_iterations: self.max_iterations,
        }
    }
}
