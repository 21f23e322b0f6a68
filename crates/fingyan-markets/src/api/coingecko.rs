//! CoinGecko markets API client
//!
//! Used for the crypto heatmap: top coins by market cap with 24h change.
//! The free tier is aggressively rate limited, so calls go through a
//! governor quota.

use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const DEFAULT_BASE: &str = "https://api.coingecko.com/api/v3";

/// One coin row from the markets endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    /// Ticker symbol, lowercase as CoinGecko serves it
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Current price in USD; null for dead listings
    pub current_price: Option<f64>,
    /// 24h change in percent; null when unavailable
    pub price_change_percentage_24h: Option<f64>,
}

/// CoinGecko client with rate limiting
pub struct CoinGeckoClient {
    client: Client,
    base: String,
    rate_limiter: SharedRateLimiter,
}

impl CoinGeckoClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `client` - shared HTTP client
    /// * `rate_limit` - requests per minute (free tier: ~10-30)
    pub fn new(client: Client, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(10).expect("nonzero")));
        Self {
            client,
            base: DEFAULT_BASE.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Override the endpoint base URL (tests, proxies)
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Top coins by market cap with 24h percentage change
    pub async fn top_markets(&self, limit: usize) -> Result<Vec<CoinMarket>> {
        self.rate_limiter.until_ready().await;

        let url = format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h",
            self.base, limit
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(MarketError::RateLimited {
                provider: "CoinGecko".to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketError::Api(format!(
                "CoinGecko markets request failed: HTTP {status}"
            )));
        }

        response
            .json::<Vec<CoinMarket>>()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse CoinGecko response: {e}")))
    }
}
