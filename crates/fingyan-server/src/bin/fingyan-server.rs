//! FinGyan chat server entry point
//!
//! Configuration comes from the environment:
//!
//! - `OPENAI_API_KEY` (required) and optional `OPENAI_API_BASE`
//! - `OPENAI_MODEL` for the completion model, defaults to gpt-5-mini
//! - `FMP_API_KEY` for company fundamentals and market movers
//! - `FINGYAN_BIND` for the listen address, defaults to 127.0.0.1:8080
//! - `RUST_LOG` for log filtering

use fingyan_llm::providers::openai::OpenAIProvider;
use fingyan_server::{ServerConfig, serve};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let provider = Arc::new(OpenAIProvider::from_env()?);

    serve(config, provider).await
}
