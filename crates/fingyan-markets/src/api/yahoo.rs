//! Yahoo Finance chart and search API client
//!
//! The v8 chart endpoint serves both current quotes (via the `meta` object)
//! and historical closes; the v1 search endpoint returns news items
//! alongside quote matches. Neither requires an API key.

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_SEARCH_BASE: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Yahoo Finance API client
pub struct YahooClient {
    client: Client,
    chart_base: String,
    search_base: String,
}

/// Chart data for one symbol over one range
#[derive(Debug, Clone)]
pub struct ChartData {
    /// Current (regular market) price
    pub price: f64,
    /// Quote currency (e.g. "USD")
    pub currency: String,
    /// Previous close used for delta calculations
    pub previous_close: f64,
    /// Unix timestamps for each candle
    pub timestamps: Vec<i64>,
    /// Close prices; entries can be null mid-series
    pub closes: Vec<Option<f64>>,
}

/// One news item from the search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNewsItem {
    pub uuid: String,
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub provider_publish_time: i64,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub resolutions: Vec<ThumbnailResolution>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailResolution {
    pub url: String,
}

impl SearchNewsItem {
    /// First available thumbnail URL, if any
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail
            .as_ref()
            .and_then(|t| t.resolutions.first())
            .map(|r| r.url.as_str())
    }
}

// Chart endpoint response shapes. Yahoo nests aggressively; only the
// fields used downstream are declared.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    currency: Option<String>,
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

impl YahooClient {
    /// Create a new client using the shared HTTP client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            chart_base: DEFAULT_CHART_BASE.to_string(),
            search_base: DEFAULT_SEARCH_BASE.to_string(),
        }
    }

    /// Override the endpoint base URLs (tests, proxies)
    pub fn with_base_urls(
        mut self,
        chart_base: impl Into<String>,
        search_base: impl Into<String>,
    ) -> Self {
        self.chart_base = chart_base.into();
        self.search_base = search_base.into();
        self
    }

    /// Fetch chart data for a symbol
    ///
    /// `range` is a Yahoo range token (1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, ytd,
    /// max); `interval` is the candle width (1d, 60m, ...).
    pub async fn chart(&self, symbol: &str, range: &str, interval: &str) -> Result<ChartData> {
        let url = format!(
            "{}/{}?range={}&interval={}",
            self.chart_base, symbol, range, interval
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "Yahoo chart request for {symbol} failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: ChartResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Yahoo chart response: {e}")))?;

        let result = parsed
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty chart result".to_string(),
            })?;

        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|q| q.close)
            .unwrap_or_default();

        Ok(ChartData {
            price: result.meta.regular_market_price.unwrap_or(0.0),
            currency: result.meta.currency.unwrap_or_else(|| "USD".to_string()),
            previous_close: result.meta.chart_previous_close.unwrap_or(0.0),
            timestamps: result.timestamp.unwrap_or_default(),
            closes,
        })
    }

    /// Search for news matching a query (symbol, ticker, or company name)
    pub async fn search_news(&self, query: &str) -> Result<Vec<SearchNewsItem>> {
        let url = format!("{}?q={}", self.search_base, query);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::Api(format!(
                "Yahoo search request for {query:?} failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Yahoo search response: {e}")))?;

        Ok(parsed.news)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "regularMarketPrice": 189.95,
                    "currency": "USD",
                    "chartPreviousClose": 185.2
                },
                "timestamp": [1700000000, 1700086400],
                "indicators": {
                    "quote": [{"close": [186.1, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let parsed: ChartResponse = serde_json::from_str(CHART_FIXTURE).expect("parse");
        let results = parsed.chart.result.expect("result");
        let result = &results[0];
        assert_eq!(result.meta.regular_market_price, Some(189.95));
        assert_eq!(result.meta.chart_previous_close, Some(185.2));
        assert_eq!(
            result.indicators.quote[0].close,
            Some(vec![Some(186.1), None])
        );
    }

    #[test]
    fn test_parse_empty_chart_result() {
        let parsed: ChartResponse =
            serde_json::from_str(r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#)
                .expect("parse");
        assert!(parsed.chart.result.is_none());
    }

    #[test]
    fn test_parse_search_response() {
        let raw = r#"{
            "quotes": [{"symbol": "AAPL"}],
            "news": [{
                "uuid": "abc-123",
                "title": "Apple hits new high",
                "publisher": "Newswire",
                "link": "https://example.com/a",
                "providerPublishTime": 1700000000,
                "thumbnail": {"resolutions": [{"url": "https://example.com/t.png"}]}
            }]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.news.len(), 1);
        assert_eq!(parsed.news[0].title, "Apple hits new high");
        assert_eq!(
            parsed.news[0].thumbnail_url(),
            Some("https://example.com/t.png")
        );
    }

    #[test]
    fn test_search_without_news_field() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"quotes": []}"#).expect("parse");
        assert!(parsed.news.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_chart() {
        let client = YahooClient::new(Client::new());
        let chart = client.chart("AAPL", "1d", "1d").await.expect("chart");
        assert!(chart.price > 0.0);
        assert_eq!(chart.currency, "USD");
    }
}
