//! alternative.me Fear & Greed index client
//!
//! Global crypto market sentiment on a 0 (Extreme Fear) to 100
//! (Extreme Greed) scale. The API serves numbers as strings.

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE: &str = "https://api.alternative.me/fng/";

/// Current Fear & Greed reading
#[derive(Debug, Clone)]
pub struct FearGreedReading {
    /// Index value, 0-100
    pub value: i64,
    /// Human classification ("Fear", "Greed", ...)
    pub classification: String,
    /// Unix timestamp of the reading
    pub timestamp: i64,
    /// Seconds until the next update
    pub time_until_update: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
    timestamp: String,
    time_until_update: Option<String>,
}

/// Client for the Fear & Greed index
pub struct FearGreedClient {
    client: Client,
    base: String,
}

impl FearGreedClient {
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

    /// Fetch the latest reading
    pub async fn latest(&self) -> Result<FearGreedReading> {
        let url = format!("{}?limit=1", self.base);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "Fear & Greed request failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: FngResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Fear & Greed response: {e}")))?;

        let entry = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| MarketError::Api("Fear & Greed response had no data".to_string()))?;

        parse_entry(entry)
    }
}

fn parse_entry(entry: FngEntry) -> Result<FearGreedReading> {
    let value = entry
        .value
        .parse::<i64>()
        .map_err(|_| MarketError::Api(format!("Non-numeric index value: {:?}", entry.value)))?;
    let timestamp = entry.timestamp.parse::<i64>().map_err(|_| {
        MarketError::Api(format!("Non-numeric timestamp: {:?}", entry.timestamp))
    })?;

    Ok(FearGreedReading {
        value,
        classification: entry.value_classification,
        timestamp,
        time_until_update: entry
            .time_until_update
            .and_then(|s| s.parse::<i64>().ok()),
    })
}
