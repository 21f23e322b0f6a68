//! Fiat currency conversion via the Frankfurter API

use crate::api::FrankfurterClient;
use crate::cache::{CacheKey, MarketCache};
use async_trait::async_trait;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ConvertParams {
    from: String,
    to: String,
    amount: f64,
}

/// Convert an amount between two fiat currencies at the latest ECB rate
pub struct CurrencyConverterTool {
    frankfurter: Arc<FrankfurterClient>,
    cache: MarketCache,
}

impl CurrencyConverterTool {
    pub fn new(frankfurter: Arc<FrankfurterClient>, cache: MarketCache) -> Self {
        Self { frankfurter, cache }
    }

    async fn fetch(&self, amount: f64, from: &str, to: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(
            from,
            "currency_convert",
            json!({ "to": to, "amount": amount.to_string() }),
        );
        let frankfurter = Arc::clone(&self.frankfurter);
        let from = from.to_string();
        let to = to.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let conv = frankfurter.convert(amount, &from, &to).await?;
                Ok(json!({
                    "from": conv.from,
                    "to": conv.to,
                    "amount": conv.amount,
                    "convertedAmount": conv.converted_amount,
                    "date": conv.date,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for CurrencyConverterTool {
    fn name(&self) -> &str {
        "currency_convert"
    }

    fn description(&self) -> &str {
        "Convert an amount of money from one currency to another, e.g. 100 USD to EUR"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from": {
                    "type": "string",
                    "description": "ISO 4217 code of the source currency, e.g. USD"
                },
                "to": {
                    "type": "string",
                    "description": "ISO 4217 code of the target currency, e.g. EUR"
                },
                "amount": {
                    "type": "number",
                    "description": "The amount to convert"
                }
            },
            "required": ["from", "to", "amount"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: ConvertParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let from = params.from.trim().to_uppercase();
        let to = params.to.trim().to_uppercase();
        if from.is_empty() || to.is_empty() {
            return Err(ToolError::InvalidParams(
                "currency codes must not be empty".into(),
            ));
        }
        if !params.amount.is_finite() || params.amount < 0.0 {
            return Err(ToolError::InvalidParams(
                "amount must be a non-negative number".into(),
            ));
        }

        match self.fetch(params.amount, &from, &to).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(from = %from, to = %to, error = %e, "currency conversion failed");
                Ok(json!({
                    "from": from,
                    "to": to,
                    "amount": params.amount,
                    "convertedAmount": 0.0,
                    "error": "Failed to convert currency",
                }))
            }
        }
    }
}
