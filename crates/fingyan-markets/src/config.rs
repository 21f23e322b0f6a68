//! Configuration for market data operations

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for market data clients and tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Cache TTL for real-time data (quotes, charts, heatmap)
    pub cache_ttl_realtime: Duration,

    /// Cache TTL for news and sentiment data
    pub cache_ttl_news: Duration,

    /// Cache TTL for fundamental data (profiles)
    pub cache_ttl_fundamental: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// CoinGecko requests per minute (free tier is tight)
    pub coingecko_rate_limit: u32,

    /// Financial Modeling Prep API key (profile and movers tools)
    pub fmp_api_key: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cache_ttl_realtime: Duration::from_secs(60),
            cache_ttl_news: Duration::from_secs(300),
            cache_ttl_fundamental: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(30),
            coingecko_rate_limit: 10,
            fmp_api_key: None,
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load the FMP API key from the `FMP_API_KEY` environment variable
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("FMP_API_KEY") {
            if !key.is_empty() {
                self.fmp_api_key = Some(key);
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.coingecko_rate_limit == 0 {
            return Err(MarketError::Config(
                "coingecko_rate_limit must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(MarketError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`MarketConfig`]
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    cache_ttl_realtime: Option<Duration>,
    cache_ttl_news: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    request_timeout: Option<Duration>,
    coingecko_rate_limit: Option<u32>,
    fmp_api_key: Option<String>,
}

impl MarketConfigBuilder {
    /// Set the real-time data TTL
    pub fn cache_ttl_realtime(mut self, ttl: Duration) -> Self {
        self.cache_ttl_realtime = Some(ttl);
        self
    }

    /// Set the news data TTL
    pub fn cache_ttl_news(mut self, ttl: Duration) -> Self {
        self.cache_ttl_news = Some(ttl);
        self
    }

    /// Set the fundamental data TTL
    pub fn cache_ttl_fundamental(mut self, ttl: Duration) -> Self {
        self.cache_ttl_fundamental = Some(ttl);
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the CoinGecko requests-per-minute limit
    pub fn coingecko_rate_limit(mut self, limit: u32) -> Self {
        self.coingecko_rate_limit = Some(limit);
        self
    }

    /// Set the FMP API key
    pub fn fmp_api_key(mut self, key: impl Into<String>) -> Self {
        self.fmp_api_key = Some(key.into());
        self
    }

    /// Build the configuration, falling back to defaults
    pub fn build(self) -> MarketConfig {
        let defaults = MarketConfig::default();
        MarketConfig {
            cache_ttl_realtime: self.cache_ttl_realtime.unwrap_or(defaults.cache_ttl_realtime),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            coingecko_rate_limit: self
                .coingecko_rate_limit
                .unwrap_or(defaults.coingecko_rate_limit),
            fmp_api_key: self.fmp_api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = MarketConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl_realtime, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let config = MarketConfig::builder()
            .cache_ttl_realtime(Duration::from_secs(5))
            .coingecko_rate_limit(30)
            .fmp_api_key("demo")
            .build();

        assert_eq!(config.cache_ttl_realtime, Duration::from_secs(5));
        assert_eq!(config.coingecko_rate_limit, 30);
        assert_eq!(config.fmp_api_key.as_deref(), Some("demo"));
        // Untouched settings fall back to defaults
        assert_eq!(config.cache_ttl_news, Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_rate_limit() {
        let config = MarketConfig::builder().coingecko_rate_limit(0).build();
        assert!(config.validate().is_err());
    }
}
