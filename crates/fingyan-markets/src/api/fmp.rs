//! Financial Modeling Prep API client
//!
//! Company fundamentals and market movers from the stable endpoint family.
//! Requires an API key (free tier available).

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE: &str = "https://financialmodelingprep.com/stable";

/// Direction for the market movers endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverDirection {
    /// Top gaining stocks
    BiggestGainers,
    /// Top losing stocks
    BiggestLosers,
}

impl MoverDirection {
    /// Endpoint path segment for this direction
    pub fn as_path(self) -> &'static str {
        match self {
            Self::BiggestGainers => "biggest-gainers",
            Self::BiggestLosers => "biggest-losers",
        }
    }
}

/// Company profile from FMP
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpProfile {
    pub symbol: String,
    pub company_name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub mkt_cap: Option<f64>,
    pub last_div: Option<f64>,
    pub beta: Option<f64>,
    pub vol_avg: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub ceo: Option<String>,
    pub image: Option<String>,
    pub exchange_short_name: Option<String>,
}

/// One market mover row
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpMover {
    pub symbol: String,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub changes_percentage: Option<f64>,
}

/// FMP API client
pub struct FmpClient {
    client: Client,
    base: String,
    api_key: String,
}

impl FmpClient {
    /// Create a new client
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base: DEFAULT_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the endpoint base URL (tests, proxies)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Fetch the company profile for a symbol
    pub async fn profile(&self, symbol: &str) -> Result<FmpProfile> {
        let url = format!(
            "{}/profile?symbol={}&apikey={}",
            self.base, symbol, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "FMP profile request for {symbol} failed: HTTP {}",
                response.status()
            )));
        }

        let profiles: Vec<FmpProfile> = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse FMP profile response: {e}")))?;

        profiles
            .into_iter()
            .next()
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no profile data".to_string(),
            })
    }

    /// Fetch the current biggest gainers or losers
    pub async fn movers(&self, direction: MoverDirection) -> Result<Vec<FmpMover>> {
        let url = format!(
            "{}/{}?apikey={}",
            self.base,
            direction.as_path(),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "FMP movers request failed: HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<FmpMover>>()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse FMP movers response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_direction_paths() {
        assert_eq!(MoverDirection::BiggestGainers.as_path(), "biggest-gainers");
        assert_eq!(MoverDirection::BiggestLosers.as_path(), "biggest-losers");
    }

    #[test]
    fn test_parse_profile() {
        let raw = r#"[{
            "symbol": "AAPL",
            "companyName": "Apple Inc.",
            "price": 189.95,
            "currency": "USD",
            "mktCap": 2950000000000,
            "lastDiv": 0.96,
            "beta": 1.28,
            "volAvg": 58000000,
            "sector": "Technology",
            "industry": "Consumer Electronics",
            "website": "https://www.apple.com",
            "description": "Apple designs consumer electronics.",
            "ceo": "Timothy Cook",
            "image": "https://example.com/AAPL.png",
            "exchangeShortName": "NASDAQ"
        }]"#;

        let profiles: Vec<FmpProfile> = serde_json::from_str(raw).expect("parse");
        let profile = &profiles[0];
        assert_eq!(profile.symbol, "AAPL");
        assert_eq!(profile.company_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.exchange_short_name.as_deref(), Some("NASDAQ"));
    }

    #[test]
    fn test_parse_movers() {
        let raw = r#"[
            {"symbol": "XYZ", "name": "XYZ Corp", "price": 4.2, "change": 1.1, "changesPercentage": 35.48},
            {"symbol": "ABC", "name": "ABC Inc", "price": 12.0, "change": 2.5, "changesPercentage": 26.31}
        ]"#;

        let movers: Vec<FmpMover> = serde_json::from_str(raw).expect("parse");
        assert_eq!(movers.len(), 2);
        assert_eq!(movers[0].changes_percentage, Some(35.48));
    }
}
