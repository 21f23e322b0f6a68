//! Frankfurter currency conversion client
//!
//! ECB reference rates; no API key. Conversion is done server-side by
//! passing the amount into the request.

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const DEFAULT_BASE: &str = "https://api.frankfurter.app";

/// Result of a currency conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Source currency code
    pub from: String,
    /// Target currency code
    pub to: String,
    /// Amount converted
    pub amount: f64,
    /// Converted amount in the target currency
    pub converted_amount: f64,
    /// Rate reference date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    date: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Frankfurter API client
pub struct FrankfurterClient {
    client: Client,
    base: String,
}

impl FrankfurterClient {
    /// Create a new client using the shared HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base: DEFAULT_BASE.to_string(),
        }
    }

    /// Override the endpoint base URL (tests, proxies)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Convert an amount between two currencies
    ///
    /// Currency codes must already be uppercased ISO 4217.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        let url = format!(
            "{}/latest?amount={}&from={}&to={}",
            self.base, amount, from, to
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "Frankfurter request {from}->{to} failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: RatesResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Frankfurter response: {e}")))?;

        let converted_amount = parsed.rates.get(to).copied().ok_or_else(|| {
            MarketError::InvalidSymbol(format!("No rate for target currency {to}"))
        })?;

        Ok(Conversion {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            converted_amount,
            date: parsed.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates_response() {
        let raw = r#"{
            "amount": 100.0,
            "base": "USD",
            "date": "2025-11-07",
            "rates": {"EUR": 92.41}
        }"#;

        let parsed: RatesResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.date, "2025-11-07");
        assert_eq!(parsed.rates.get("EUR"), Some(&92.41));
        assert_eq!(parsed.rates.get("JPY"), None);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_convert() {
        let client = FrankfurterClient::new(Client::new());
        let conversion = client.convert(100.0, "USD", "EUR").await.expect("convert");
        assert!(conversion.converted_amount > 0.0);
        assert_eq!(conversion.to, "EUR");
    }
}
