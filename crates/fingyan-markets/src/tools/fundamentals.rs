//! Company fundamentals and market movers, backed by FMP

use crate::api::{FmpClient, MoverDirection};
use crate::cache::{CacheKey, MarketCache};
use async_trait::async_trait;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const MAX_MOVERS: usize = 5;

#[derive(Debug, Deserialize)]
struct ProfileParams {
    symbol: String,
}

/// Company profile card: market cap, sector, CEO, description
pub struct CompanyProfileTool {
    fmp: Arc<FmpClient>,
    cache: MarketCache,
}

impl CompanyProfileTool {
    pub fn new(fmp: Arc<FmpClient>, cache: MarketCache) -> Self {
        Self { fmp, cache }
    }

    async fn fetch(&self, symbol: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(symbol, "company_profile", json!({}));
        let fmp = Arc::clone(&self.fmp);
        let symbol = symbol.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let profile = fmp.profile(&symbol).await?;
                Ok(json!({
                    "symbol": profile.symbol,
                    "name": profile.company_name,
                    "price": profile.price,
                    "currency": profile.currency,
                    "marketCap": profile.mkt_cap,
                    // FMP's stable profile has no P/E field, lastDiv is the
                    // closest per-share ratio it exposes
                    "peRatio": profile.last_div,
                    "beta": profile.beta,
                    "volume": profile.vol_avg,
                    "sector": profile.sector,
                    "industry": profile.industry,
                    "website": profile.website,
                    "description": profile.description,
                    "ceo": profile.ceo,
                    "logo": profile.image,
                    "exchange": profile.exchange_short_name,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CompanyProfileTool {
    fn name(&self) -> &str {
        "company_profile"
    }

    fn description(&self) -> &str {
        "Get a company's profile and fundamentals: market cap, sector, industry, CEO and description"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The stock ticker symbol, e.g. MSFT"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: ProfileParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let symbol = params.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ToolError::InvalidParams("symbol must not be empty".into()));
        }

        match self.fetch(&symbol).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "company profile lookup failed");
                Ok(json!({
                    "symbol": symbol,
                    "error": "Failed to load company fundamentals.",
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MoversParams {
    #[serde(rename = "type")]
    direction: String,
}

/// Today's biggest gainers or losers
pub struct MarketMoversTool {
    fmp: Arc<FmpClient>,
    cache: MarketCache,
}

impl MarketMoversTool {
    pub fn new(fmp: Arc<FmpClient>, cache: MarketCache) -> Self {
        Self { fmp, cache }
    }

    async fn fetch(&self, direction: MoverDirection, label: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new("market", "movers", json!({ "type": label }));
        let fmp = Arc::clone(&self.fmp);
        let label = label.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let movers = fmp.movers(direction).await?;
                let movers: Vec<Value> = movers
                    .into_iter()
                    .take(MAX_MOVERS)
                    .map(|m| {
                        json!({
                            "symbol": m.symbol,
                            "name": m.name,
                            "price": m.price,
                            "change": m.change,
                            "changePercent": m.changes_percentage,
                        })
                    })
                    .collect();
                Ok(json!({ "type": label, "movers": movers }))
            })
            .await
    }
}

#[async_trait]
impl Tool for MarketMoversTool {
    fn name(&self) -> &str {
        "market_movers"
    }

    fn description(&self) -> &str {
        "Get today's biggest stock market gainers or losers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["biggest-gainers", "biggest-losers"],
                    "description": "Whether to fetch the biggest gainers or the biggest losers"
                }
            },
            "required": ["type"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: MoversParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let direction = match params.direction.as_str() {
            "biggest-gainers" => MoverDirection::BiggestGainers,
            "biggest-losers" => MoverDirection::BiggestLosers,
            other => {
                return Err(ToolError::InvalidParams(format!(
                    "type must be 'biggest-gainers' or 'biggest-losers', got '{other}'"
                )));
            }
        };

        match self.fetch(direction, &params.direction).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(direction = %params.direction, error = %e, "movers lookup failed");
                Ok(json!({
                    "type": params.direction,
                    "movers": [],
                    "error": "Failed to fetch market data.",
                }))
            }
        }
    }
}
