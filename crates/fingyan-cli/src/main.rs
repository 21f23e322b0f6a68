//! Interactive terminal chat for the FinGyan finance assistant
//!
//! Talks to an OpenAI-compatible endpoint and renders tool results as
//! terminal widgets instead of a web UI.
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export FMP_API_KEY="..."        # optional, enables fundamentals tools
//! cargo run --bin fingyan
//! ```

mod format;
mod render;

use clap::Parser;
use fingyan_llm::Message;
use fingyan_llm::providers::openai::{OpenAIConfig, OpenAIProvider};
use fingyan_markets::{MarketConfig, market_tool_registry};
use fingyan_server::{ChatEngine, ChatEvent, EngineConfig};
use futures::StreamExt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fingyan", about = "Chat with the FinGyan finance assistant")]
struct Args {
    /// Model to request completions from
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-5-mini")]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_API_BASE")]
    api_base: Option<String>,

    /// Maximum model / tool round trips per turn
    #[arg(long, default_value_t = 10)]
    max_iterations: usize,
}

fn print_banner() {
    println!(
        r"
  ___ _       ___
 | __(_)_ _  / __|_  _ __ _ _ _
 | _|| | ' \| (_ | || / _` | ' \
 |_| |_|_||_|\___|\_, \__,_|_||_|
                  |__/

 Ask about stocks, crypto, news, FX rates and more.
 Commands: /help  /tools  /exit
"
    );
}

fn print_help() {
    println!(
        "Ask anything finance related, for example:\n\
         \x20 \"how is AAPL doing today?\"\n\
         \x20 \"chart BTC over the last 3 months\"\n\
         \x20 \"convert 500 USD to JPY\"\n\
         \n\
         Commands:\n\
         \x20 /help   - show this help\n\
         \x20 /tools  - list the data tools the assistant can use\n\
         \x20 /exit   - quit\n"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    print_banner();

    let mut openai_config = OpenAIConfig::from_env()?;
    if let Some(api_base) = args.api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    let provider = Arc::new(OpenAIProvider::with_config(openai_config)?);

    let market_config = MarketConfig::default().with_env_api_key();
    let registry = Arc::new(market_tool_registry(&market_config)?);

    let engine = ChatEngine::new(
        provider,
        Arc::clone(&registry),
        EngineConfig {
            model: args.model.clone(),
            max_iterations: args.max_iterations,
            ..EngineConfig::default()
        },
    );
    println!(" model: {}\n", args.model);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut history: Vec<Message> = Vec::new();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!("\nbye");
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" | "/quit" => {
                println!("bye");
                break;
            }
            "/help" => {
                print_help();
                continue;
            }
            "/tools" => {
                for tool in registry.list_tools() {
                    println!("  {:<18} {}", tool.name(), tool.description());
                }
                println!();
                continue;
            }
            _ => {}
        }

        history.push(Message::user(input));
        let assistant_text = run_turn(&engine, history.clone(), &mut stdout).await?;
        if assistant_text.is_empty() {
            // Keep the transcript consistent if the turn failed outright
            history.pop();
        } else {
            history.push(Message::assistant(assistant_text));
        }
    }

    Ok(())
}

/// Stream one turn to the terminal, returning the assistant's full text
async fn run_turn(
    engine: &ChatEngine,
    messages: Vec<Message>,
    stdout: &mut io::Stdout,
) -> anyhow::Result<String> {
    let mut stream = engine.stream(messages);
    let mut assistant_text = String::new();

    while let Some(event) = stream.next().await {
        match event {
            ChatEvent::TextDelta { delta } => {
                print!("{delta}");
                stdout.flush()?;
                assistant_text.push_str(&delta);
            }
            ChatEvent::ToolInputAvailable { tool_name, .. } => {
                println!("\n  ⋯ fetching {tool_name}");
            }
            ChatEvent::ToolOutputAvailable {
                tool_name, output, ..
            } => {
                println!("{}", render::render_tool_output(&tool_name, &output));
            }
            ChatEvent::ToolOutputError {
                tool_name,
                error_text,
                ..
            } => {
                println!("  ⚠ {tool_name}: {error_text}");
            }
            ChatEvent::Finish { .. } => {
                println!("\n");
            }
            ChatEvent::Error { message } => {
                eprintln!("\nerror: {message}\n");
            }
        }
    }

    Ok(assistant_text)
}
