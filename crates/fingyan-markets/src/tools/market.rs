//! Market-wide tools, sentiment index and the top-coins heatmap

use crate::api::{CoinGeckoClient, FearGreedClient};
use crate::cache::{CacheKey, MarketCache};
use async_trait::async_trait;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const DEFAULT_HEATMAP_SIZE: usize = 15;
const MAX_HEATMAP_SIZE: usize = 100;

/// Crypto Fear & Greed index
pub struct CryptoSentimentTool {
    feargreed: Arc<FearGreedClient>,
    cache: MarketCache,
}

impl CryptoSentimentTool {
    pub fn new(feargreed: Arc<FearGreedClient>, cache: MarketCache) -> Self {
        Self { feargreed, cache }
    }

    async fn fetch(&self) -> crate::error::Result<Value> {
        let key = CacheKey::new("crypto", "sentiment", json!({}));
        let feargreed = Arc::clone(&self.feargreed);
        self.cache
            .get_or_fetch(key, || async move {
                let reading = feargreed.latest().await?;
                Ok(json!({
                    "value": reading.value,
                    "classification": reading.classification,
                    "timestamp": reading.timestamp,
                    "timeUntilUpdate": reading.time_until_update,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CryptoSentimentTool {
    fn name(&self) -> &str {
        "crypto_sentiment"
    }

    fn description(&self) -> &str {
        "Get the current crypto market Fear & Greed index (0 = extreme fear, 100 = extreme greed)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _params: Value) -> ToolResult<Value> {
        match self.fetch().await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(error = %e, "sentiment lookup failed");
                Ok(json!({
                    "value": 50,
                    "classification": "Neutral",
                    "error": "Failed to fetch sentiment",
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct HeatmapParams {
    limit: Option<usize>,
}

/// Top coins by market cap with 24h change, for a heatmap widget
pub struct CryptoHeatmapTool {
    coingecko: Arc<CoinGeckoClient>,
    cache: MarketCache,
}

impl CryptoHeatmapTool {
    pub fn new(coingecko: Arc<CoinGeckoClient>, cache: MarketCache) -> Self {
        Self { coingecko, cache }
    }

    async fn fetch(&self, limit: usize) -> crate::error::Result<Value> {
        let key = CacheKey::new("crypto", "heatmap", json!({ "limit": limit }));
        let coingecko = Arc::clone(&self.coingecko);
        self.cache
            .get_or_fetch(key, || async move {
                let markets = coingecko.top_markets(limit).await?;
                let coins: Vec<Value> = markets
                    .into_iter()
                    .map(|coin| {
                        json!({
                            "symbol": coin.symbol.to_uppercase(),
                            "shortName": coin.name,
                            "price": coin.current_price.unwrap_or(0.0),
                            "changePercent": coin.price_change_percentage_24h.unwrap_or(0.0),
                        })
                    })
                    .collect();
                Ok(json!({ "coins": coins }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CryptoHeatmapTool {
    fn name(&self) -> &str {
        "crypto_heatmap"
    }

    fn description(&self) -> &str {
        "Get the top cryptocurrencies by market cap with their 24h price change"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "How many coins to include, defaults to 15"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: HeatmapParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let limit = params
            .limit
            .unwrap_or(DEFAULT_HEATMAP_SIZE)
            .clamp(1, MAX_HEATMAP_SIZE);

        match self.fetch(limit).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(limit, error = %e, "heatmap lookup failed");
                Ok(json!({
                    "coins": [],
                    "error": "Failed to load heatmap data.",
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use reqwest::Client;
    use std::time::Duration;

    fn short_client() -> Client {
        Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client")
    }

    #[tokio::test]
    async fn test_sentiment_degrades_to_neutral() {
        let feargreed =
            Arc::new(FearGreedClient::new(short_client()).with_base_url("http://127.0.0.1:9/fng"));
        let tool = CryptoSentimentTool::new(
            feargreed,
            MarketCache::new(MarketConfig::default().cache_ttl_news),
        );

        let out = tool.execute(json!({})).await.expect("degraded output");
        assert_eq!(out["value"], 50);
        assert_eq!(out["classification"], "Neutral");
        assert_eq!(out["error"], "Failed to fetch sentiment");
    }

    #[tokio::test]
    async fn test_heatmap_degrades_with_empty_coins() {
        let coingecko = Arc::new(
            CoinGeckoClient::new(short_client(), 10).with_base_url("http://127.0.0.1:9/markets"),
        );
        let tool = CryptoHeatmapTool::new(
            coingecko,
            MarketCache::new(MarketConfig::default().cache_ttl_realtime),
        );

        let out = tool
            .execute(json!({ "limit": 5 }))
            .await
            .expect("degraded output");
        assert!(out["coins"].as_array().expect("array").is_empty());
        assert_eq!(out["error"], "Failed to load heatmap data.");
    }

    #[tokio::test]
    async fn test_heatmap_limit_is_clamped() {
        let coingecko = Arc::new(
            CoinGeckoClient::new(short_client(), 10).with_base_url("http://127.0.0.1:9/markets"),
        );
        let tool = CryptoHeatmapTool::new(
            coingecko,
            MarketCache::new(MarketConfig::default().cache_ttl_realtime),
        );

        // A zero limit is nonsense but should not be a hard error
        let out = tool
            .execute(json!({ "limit": 0 }))
            .await
            .expect("degraded output");
        assert!(out.get("error").is_some());
    }
}
