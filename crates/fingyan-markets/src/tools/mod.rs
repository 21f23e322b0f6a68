//! Finance tools the language model can call
//!
//! One tool per widget the assistant can render. All tools share one HTTP
//! client and a small set of TTL caches, and all follow the crate's
//! degraded-output contract (see the crate docs).

pub mod crypto;
pub mod currency;
pub mod fundamentals;
pub mod market;
pub mod news;
pub mod stock;

pub use crypto::{CryptoChartTool, CryptoPriceTool};
pub use currency::CurrencyConverterTool;
pub use fundamentals::{CompanyProfileTool, MarketMoversTool};
pub use market::{CryptoHeatmapTool, CryptoSentimentTool};
pub use news::NewsTool;
pub use stock::{StockChartTool, StockPriceTool};

use crate::api::{CoinGeckoClient, FearGreedClient, FmpClient, FrankfurterClient, YahooClient};
use crate::cache::MarketCache;
use crate::config::MarketConfig;
use crate::error::Result;
use fingyan_tools::ToolRegistry;
use reqwest::Client;
use std::sync::Arc;

/// Build the full tool registry from a market config
///
/// All ten tools share one `reqwest::Client`; real-time, news, and
/// fundamental data get separate caches with their own TTLs.
pub fn market_tool_registry(config: &MarketConfig) -> Result<ToolRegistry> {
    config.validate()?;

    // Yahoo rejects requests without a user agent
    let client = Client::builder()
        .timeout(config.request_timeout)
        .user_agent("fingyan/0.1")
        .build()?;

    let yahoo = Arc::new(YahooClient::new(client.clone()));
    let coingecko = Arc::new(CoinGeckoClient::new(
        client.clone(),
        config.coingecko_rate_limit,
    ));
    let feargreed = Arc::new(FearGreedClient::new(client.clone()));
    let frankfurter = Arc::new(FrankfurterClient::new(client.clone()));
    let fmp = Arc::new(FmpClient::new(
        client,
        config.fmp_api_key.clone().unwrap_or_default(),
    ));

    let realtime = MarketCache::new(config.cache_ttl_realtime);
    let news = MarketCache::new(config.cache_ttl_news);
    let fundamental = MarketCache::new(config.cache_ttl_fundamental);

    let registry = ToolRegistry::new();
    registry.register(Arc::new(StockPriceTool::new(
        Arc::clone(&yahoo),
        realtime.clone(),
    )));
    registry.register(Arc::new(StockChartTool::new(
        Arc::clone(&yahoo),
        realtime.clone(),
    )));
    registry.register(Arc::new(CryptoPriceTool::new(
        Arc::clone(&yahoo),
        realtime.clone(),
    )));
    registry.register(Arc::new(CryptoChartTool::new(
        Arc::clone(&yahoo),
        realtime.clone(),
    )));
    registry.register(Arc::new(NewsTool::new(yahoo, news.clone())));
    registry.register(Arc::new(CryptoSentimentTool::new(feargreed, news)));
    registry.register(Arc::new(CryptoHeatmapTool::new(coingecko, realtime.clone())));
    registry.register(Arc::new(CurrencyConverterTool::new(
        frankfurter,
        realtime.clone(),
    )));
    registry.register(Arc::new(CompanyProfileTool::new(
        Arc::clone(&fmp),
        fundamental,
    )));
    registry.register(Arc::new(MarketMoversTool::new(fmp, realtime)));

    Ok(registry)
}
