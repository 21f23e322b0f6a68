//! Equity quote and chart tools backed by the Yahoo chart API

use crate::api::YahooClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::MarketError;
use async_trait::async_trait;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct StockPriceParams {
    symbol: String,
}

/// Latest price for a stock ticker
pub struct StockPriceTool {
    yahoo: Arc<YahooClient>,
    cache: MarketCache,
}

impl StockPriceTool {
    pub fn new(yahoo: Arc<YahooClient>, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    async fn fetch(&self, symbol: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(symbol, "stock_price", json!({}));
        let yahoo = Arc::clone(&self.yahoo);
        let symbol = symbol.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let chart = yahoo.chart(&symbol, "1d", "1d").await?;
                Ok(json!({
                    "symbol": symbol,
                    "price": chart.price,
                    "currency": chart.currency,
                    "previousClose": chart.previous_close,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        "stock_price"
    }

    fn description(&self) -> &str {
        "Get the current price of a stock by its ticker symbol, such as AAPL or TSLA"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The stock ticker symbol, e.g. AAPL"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: StockPriceParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let symbol = params.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ToolError::InvalidParams("symbol must not be empty".into()));
        }

        match self.fetch(&symbol).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "stock price lookup failed");
                Ok(json!({
                    "symbol": symbol,
                    "price": 0.0,
                    "currency": "USD",
                    "previousClose": 0.0,
                    "error": "Failed to fetch price",
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct StockChartParams {
    symbol: String,
    range: Option<String>,
}

/// Historical daily closes for a stock ticker
pub struct StockChartTool {
    yahoo: Arc<YahooClient>,
    cache: MarketCache,
}

impl StockChartTool {
    pub fn new(yahoo: Arc<YahooClient>, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    // Intraday ranges are pointless on a daily-interval chart, widen to 1y.
    fn effective_range(range: Option<&str>) -> String {
        match range {
            None | Some("1d") => "1y".to_string(),
            Some(other) => other.to_string(),
        }
    }

    async fn fetch(&self, symbol: &str, range: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(symbol, "stock_chart", json!({ "range": range }));
        let yahoo = Arc::clone(&self.yahoo);
        let symbol = symbol.to_string();
        let range = range.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let chart = yahoo.chart(&symbol, &range, "1d").await?;
                if chart.timestamps.is_empty() {
                    return Err(MarketError::DataUnavailable {
                        symbol: symbol.clone(),
                        reason: "chart returned no data points".to_string(),
                    });
                }
                let last_close = chart
                    .closes
                    .iter()
                    .rev()
                    .find_map(|c| *c)
                    .unwrap_or(chart.price);
                Ok(json!({
                    "symbol": symbol,
                    "stockPrice": last_close,
                    "prices": chart.closes,
                    "timestamp": chart.timestamps,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for StockChartTool {
    fn name(&self) -> &str {
        "stock_chart"
    }

    fn description(&self) -> &str {
        "Get historical closing prices for a stock to render a price chart"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The stock ticker symbol, e.g. AAPL"
                },
                "range": {
                    "type": "string",
                    "enum": ["5d", "1mo", "3mo", "6mo", "1y", "5y", "ytd", "max"],
                    "description": "How far back to chart, defaults to 1y"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: StockChartParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let symbol = params.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ToolError::InvalidParams("symbol must not be empty".into()));
        }
        let range = Self::effective_range(params.range.as_deref());

        match self.fetch(&symbol, &range).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(symbol = %symbol, range = %range, error = %e, "stock chart lookup failed");
                Ok(json!({
                    "symbol": symbol,
                    "stockPrice": 0.0,
                    "prices": [],
                    "timestamp": [],
                    "error": "Failed to load chart data.",
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

    fn unreachable_yahoo() -> Arc<YahooClient> {
        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client");
        Arc::new(
            YahooClient::new(client)
                .with_base_urls("http://127.0.0.1:9/chart", "http://127.0.0.1:9/search"),
        )
    }

    fn cache() -> MarketCache {
        MarketCache::new(MarketConfig::default().cache_ttl_realtime)
    }

    #[tokio::test]
    async fn test_stock_price_degrades_on_fetch_failure() {
        let tool = StockPriceTool::new(unreachable_yahoo(), cache());
        let out = tool
            .execute(json!({ "symbol": "aapl" }))
            .await
            .expect("degraded output, not an error");
        assert_eq!(out["symbol"], "AAPL");
        assert_eq!(out["error"], "Failed to fetch price");
        assert_eq!(out["price"], 0.0);
    }

    #[tokio::test]
    async fn test_stock_price_rejects_empty_symbol() {
        let tool = StockPriceTool::new(unreachable_yahoo(), cache());
        let err = tool.execute(json!({ "symbol": "  " })).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_stock_chart_degrades_with_empty_series() {
        let tool = StockChartTool::new(unreachable_yahoo(), cache());
        let out = tool
            .execute(json!({ "symbol": "TSLA", "range": "3mo" }))
            .await
            .expect("degraded output");
        assert_eq!(out["error"], "Failed to load chart data.");
        assert!(out["prices"].as_array().expect("array").is_empty());
        assert!(out["timestamp"].as_array().expect("array").is_empty());
    }

    #[test]
    fn test_chart_range_enum_offers_year_to_date() {
        let tool = StockChartTool::new(unreachable_yahoo(), cache());
        let schema = tool.input_schema();
        let ranges = schema["properties"]["range"]["enum"]
            .as_array()
            .expect("enum")
            .clone();
        assert!(ranges.contains(&json!("ytd")));
        assert_eq!(StockChartTool::effective_range(Some("ytd")), "ytd");
    }

    #[test]
    fn test_intraday_range_widens_to_one_year() {
        assert_eq!(StockChartTool::effective_range(Some("1d")), "1y");
        assert_eq!(StockChartTool::effective_range(None), "1y");
        assert_eq!(StockChartTool::effective_range(Some("6mo")), "6mo");
    }
}
