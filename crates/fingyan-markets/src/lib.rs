//! Market data layer for fingyan
//!
//! Typed clients for the external finance APIs the assistant draws on
//! (Yahoo Finance chart/search, CoinGecko, alternative.me Fear & Greed,
//! Frankfurter FX rates, Financial Modeling Prep), a TTL cache in front of
//! them, and the ten data-fetching tools the language model can call.
//!
//! # Degraded-output contract
//!
//! Every tool in this crate resolves to a renderable payload. A failed
//! fetch (network error, non-2xx status, missing fields) produces a
//! degraded payload carrying an `"error"` string field rather than an
//! `Err`, so the presentation layer always has a widget to draw and the
//! model can explain what went wrong. Only invalid tool parameters surface
//! as hard errors.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tools;

pub use cache::{CacheKey, MarketCache};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use tools::market_tool_registry;
