//! Headline search over the Yahoo search endpoint

use crate::api::YahooClient;
use crate::cache::{CacheKey, MarketCache};
use async_trait::async_trait;
use chrono::DateTime;
use fingyan_tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

const MAX_HEADLINES: usize = 5;

#[derive(Debug, Deserialize)]
struct NewsParams {
    query: String,
}

/// Recent headlines for a ticker or topic
pub struct NewsTool {
    yahoo: Arc<YahooClient>,
    cache: MarketCache,
}

impl NewsTool {
    pub fn new(yahoo: Arc<YahooClient>, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    async fn fetch(&self, query: &str) -> crate::error::Result<Value> {
        let key = CacheKey::new(query, "news", json!({}));
        let yahoo = Arc::clone(&self.yahoo);
        let query = query.to_string();
        self.cache
            .get_or_fetch(key, || async move {
                let items = yahoo.search_news(&query).await?;
                let news: Vec<Value> = items
                    .into_iter()
                    .take(MAX_HEADLINES)
                    .map(|item| {
                        let thumbnail = item
                            .thumbnail_url()
                            .map_or(Value::Null, |url| Value::String(url.to_string()));
                        json!({
                            "uuid": item.uuid,
                            "title": item.title,
                            "publisher": item.publisher,
                            "link": item.link,
                            "publishTime": format_publish_time(item.provider_publish_time),
                            "thumbnail": thumbnail,
                        })
                    })
                    .collect();
                // No matches is still a valid answer, not a failure
                Ok(json!({ "query": query, "news": news }))
            })
            .await
    }
}

/// Render a unix timestamp as a short human date like "Nov 14, 10:13 PM"
fn format_publish_time(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.format("%b %-d, %-I:%M %p").to_string())
        .unwrap_or_default()
}

#[async_trait]
impl Tool for NewsTool {
    fn name(&self) -> &str {
        "news"
    }

    fn description(&self) -> &str {
        "Get the latest financial news headlines for a ticker, company or topic"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A ticker symbol or topic to search news for, e.g. NVDA or inflation"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: NewsParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err(ToolError::InvalidParams("query must not be empty".into()));
        }

        match self.fetch(&query).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "news search failed");
                Ok(json!({
                    "query": query,
                    "news": [],
                    "error": "Failed to fetch news.",
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

    #[test]
    fn test_format_publish_time() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(format_publish_time(1_700_000_000), "Nov 14, 10:13 PM");
        // 2021-01-01 00:00:00 UTC
        assert_eq!(format_publish_time(1_609_459_200), "Jan 1, 12:00 AM");
    }

    #[test]
    fn test_format_publish_time_out_of_range() {
        assert_eq!(format_publish_time(i64::MAX), "");
    }

    #[tokio::test]
    async fn test_news_degrades_on_fetch_failure() {
        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client");
        let yahoo = Arc::new(
            YahooClient::new(client)
                .with_base_urls("http://127.0.0.1:9/chart", "http://127.0.0.1:9/search"),
        );
        let tool = NewsTool::new(
            yahoo,
            MarketCache::new(MarketConfig::default().cache_ttl_news),
        );

        let out = tool
            .execute(json!({ "query": "NVDA" }))
            .await
            .expect("degraded output");
        assert_eq!(out["query"], "NVDA");
        assert_eq!(out["error"], "Failed to fetch news.");
        assert!(out["news"].as_array().expect("array").is_empty());
    }
}
