//! Crypto quote and chart tools
//!
//! Yahoo quotes crypto as `BTC-USD` pairs, so both tools accept a bare
//! ticker and normalize it before querying.

use crate::api::YahooClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::MarketError;
use async_trait::async_trait;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const LOGO_BASE: &str = "https://lcw.nyc3.cdn.digitaloceanspaces.com/production/currencies/64";

/// Uppercase and append `-USD` unless the pair is already spelled out.
/// Returns `(pair, bare_ticker)`.
fn normalize_pair(symbol: &str) -> (String, String) {
    let upper = symbol.trim().to_uppercase();
    let pair = if upper.ends_with("-USD") {
        upper.clone()
    } else {
        format!("{upper}-USD")
    };
    let bare = pair.trim_end_matches("-USD").to_string();
    (pair, bare)
}

fn logo_url(bare: &str) -> String {
    format!("{LOGO_BASE}/{}.png", bare.to_lowercase())
}

#[derive(Debug, Deserialize)]
struct CryptoPriceParams {
    symbol: String,
}

/// Spot price for a cryptocurrency
pub struct CryptoPriceTool {
    yahoo: Arc<YahooClient>,
    cache: MarketCache,
}

impl CryptoPriceTool {
    pub fn new(yahoo: Arc<YahooClient>, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    async fn fetch(&self, pair: &str, bare: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(pair, "crypto_price", json!({}));
        let yahoo = Arc::clone(&self.yahoo);
        let pair = pair.to_string();
        let bare = bare.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let chart = yahoo.chart(&pair, "1d", "1d").await?;
                Ok(json!({
                    "symbol": bare,
                    "price": chart.price,
                    "currency": chart.currency,
                    "previousClose": chart.previous_close,
                    "logoUrl": logo_url(&bare),
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CryptoPriceTool {
    fn name(&self) -> &str {
        "crypto_price"
    }

    fn description(&self) -> &str {
        "Get the current price of a cryptocurrency by its ticker, such as BTC or ETH"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The crypto ticker, e.g. BTC. The -USD suffix is optional"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: CryptoPriceParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        if params.symbol.trim().is_empty() {
            return Err(ToolError::InvalidParams("symbol must not be empty".into()));
        }
        let (pair, bare) = normalize_pair(&params.symbol);

        match self.fetch(&pair, &bare).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(symbol = %pair, error = %e, "crypto price lookup failed");
                Ok(json!({
                    "symbol": bare,
                    "price": 0.0,
                    "currency": "USD",
                    "previousClose": 0.0,
                    "logoUrl": logo_url(&bare),
                    "error": "Failed to fetch price",
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CryptoChartParams {
    symbol: String,
    range: Option<String>,
}

/// Historical prices for a cryptocurrency
pub struct CryptoChartTool {
    yahoo: Arc<YahooClient>,
    cache: MarketCache,
}

impl CryptoChartTool {
    pub fn new(yahoo: Arc<YahooClient>, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    // Short ranges need intraday candles to show anything useful.
    fn interval_for(range: &str) -> &'static str {
        match range {
            "1d" | "5d" => "60m",
            _ => "1d",
        }
    }

    async fn fetch(&self, pair: &str, bare: &str, range: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(pair, "crypto_chart", json!({ "range": range }));
        let interval = Self::interval_for(range);
        let yahoo = Arc::clone(&self.yahoo);
        let pair = pair.to_string();
        let bare = bare.to_string();
        let range = range.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let chart = yahoo.chart(&pair, &range, interval).await?;
                if chart.timestamps.is_empty() || chart.closes.is_empty() {
                    return Err(MarketError::DataUnavailable {
                        symbol: pair.clone(),
                        reason: "chart returned incomplete data".to_string(),
                    });
                }
                Ok(json!({
                    "symbol": bare,
                    "prices": chart.closes,
                    "timestamp": chart.timestamps,
                    "currentPrice": chart.price,
                    "currency": chart.currency,
                    "rangeUsed": range,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CryptoChartTool {
    fn name(&self) -> &str {
        "crypto_chart"
    }

    fn description(&self) -> &str {
        "Get historical prices for a cryptocurrency to render a price chart"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The crypto ticker, e.g. BTC. The -USD suffix is optional"
                },
                "range": {
                    "type": "string",
                    "enum": ["1d", "5d", "1mo", "3mo", "6mo", "1y", "5y", "ytd", "max"],
                    "description": "How far back to chart, defaults to 1mo"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: CryptoChartParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        if params.symbol.trim().is_empty() {
            return Err(ToolError::InvalidParams("symbol must not be empty".into()));
        }
        let (pair, bare) = normalize_pair(&params.symbol);
        let range = params.range.unwrap_or_else(|| "1mo".to_string());

        match self.fetch(&pair, &bare, &range).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(symbol = %pair, range = %range, error = %e, "crypto chart lookup failed");
                Ok(json!({
                    "symbol": bare,
                    "prices": [],
                    "timestamp": [],
                    "currentPrice": 0.0,
                    "error": "Failed to load historical data.",
                }))
            }
        }
    }
}
