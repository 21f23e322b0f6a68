//! Terminal widgets for tool outputs
//!
//! Mirrors the web UI's widget mapping: each tool name has a renderer,
//! and payloads carrying an `error` field fall back to a one-line notice
//! instead of a widget.

use crate::format::{format_change, format_compact, format_money, format_percent, sparkline};
use chrono::DateTime;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{Cell, Table};
use serde_json::Value;

/// Render a tool's output payload for the terminal
pub fn render_tool_output(tool_name: &str, output: &Value) -> String {
    if let Some(error) = output.get("error").and_then(Value::as_str) {
        return render_degraded(tool_name, output, error);
    }

    match tool_name {
        "stock_price" | "crypto_price" => render_price_card(output),
        "stock_chart" | "crypto_chart" => render_chart(output),
        "news" => render_news(output),
        "crypto_sentiment" => render_sentiment(output),
        "crypto_heatmap" => render_heatmap(output),
        "currency_convert" => render_conversion(output),
        "company_profile" => render_profile(output),
        "market_movers" => render_movers(output),
        _ => serde_json::to_string_pretty(output).unwrap_or_else(|_| output.to_string()),
    }
}

fn render_degraded(tool_name: &str, output: &Value, error: &str) -> String {
    let subject = output
        .get("symbol")
        .or_else(|| output.get("query"))
        .and_then(Value::as_str)
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    format!("  ⚠ {tool_name}{subject}: {error}")
}

fn render_price_card(output: &Value) -> String {
    let symbol = str_field(output, "symbol");
    let currency = output
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or("USD");
    let price = num_field(output, "price");
    let previous_close = num_field(output, "previousClose");

    let mut table = new_table();
    table.set_header(vec![symbol.clone(), String::new()]);
    table.add_row(vec![
        "Price".to_string(),
        format_money(price, currency),
    ]);
    table.add_row(vec![
        "Prev close".to_string(),
        format_money(previous_close, currency),
    ]);
    table.add_row(vec![
        "Change".to_string(),
        format_change(price, previous_close),
    ]);
    table.to_string()
}

fn render_chart(output: &Value) -> String {
    let symbol = str_field(output, "symbol");
    let empty = Vec::new();
    let prices: Vec<Option<f64>> = output
        .get("prices")
        .and_then(Value::as_array)
        .unwrap_or(&empty)
        .iter()
        .map(Value::as_f64)
        .collect();
    let timestamps = output
        .get("timestamp")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let closes: Vec<f64> = prices.iter().filter_map(|p| *p).collect();
    let Some((&first, &last)) = closes.first().zip(closes.last()) else {
        return format!("  {symbol}: no chart data");
    };
    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let percent = if first.abs() > f64::EPSILON {
        (last - first) / first * 100.0
    } else {
        0.0
    };

    let span = match (
        timestamps.first().and_then(Value::as_i64),
        timestamps.last().and_then(Value::as_i64),
    ) {
        (Some(start), Some(end)) => format!("{} → {}", short_date(start), short_date(end)),
        _ => String::new(),
    };

    format!(
        "  {symbol}  {span}\n  {}\n  low {min:.2}  high {max:.2}  last {last:.2}  ({})",
        sparkline(&prices),
        format_percent(percent)
    )
}

fn render_news(output: &Value) -> String {
    let empty = Vec::new();
    let items = output
        .get("news")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    if items.is_empty() {
        let query = str_field(output, "query");
        return format!("  No recent news for {query}");
    }

    let mut table = new_table();
    table.set_header(vec!["Headline", "Source", "Published"]);
    for item in items {
        table.add_row(vec![
            Cell::new(str_field(item, "title")),
            Cell::new(str_field(item, "publisher")),
            Cell::new(str_field(item, "publishTime")),
        ]);
    }
    table.to_string()
}

fn render_sentiment(output: &Value) -> String {
    let value = output.get("value").and_then(Value::as_i64).unwrap_or(50);
    let classification = str_field(output, "classification");

    // 20-segment gauge from extreme fear to extreme greed
    let filled = (value.clamp(0, 100) as usize) / 5;
    let gauge: String = "█".repeat(filled) + &"░".repeat(20 - filled);
    format!("  Fear & Greed: {value}/100  [{gauge}]  {classification}")
}

fn render_heatmap(output: &Value) -> String {
    let empty = Vec::new();
    let coins = output
        .get("coins")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    if coins.is_empty() {
        return "  No market data".to_string();
    }

    let mut table = new_table();
    table.set_header(vec!["Coin", "Price", "24h"]);
    for coin in coins {
        table.add_row(vec![
            Cell::new(format!(
                "{} {}",
                str_field(coin, "symbol"),
                str_field(coin, "shortName")
            )),
            Cell::new(format_money(num_field(coin, "price"), "USD")),
            Cell::new(format_percent(num_field(coin, "changePercent"))),
        ]);
    }
    table.to_string()
}

fn render_conversion(output: &Value) -> String {
    let amount = num_field(output, "amount");
    let converted = num_field(output, "convertedAmount");
    let from = str_field(output, "from");
    let to = str_field(output, "to");
    let date = str_field(output, "date");
    format!("  {amount:.2} {from} = {converted:.2} {to}  (rate date {date})")
}

fn render_profile(output: &Value) -> String {
    let mut table = new_table();
    let name = output
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_else(|| output.get("symbol").and_then(Value::as_str).unwrap_or("?"));
    table.set_header(vec![name.to_string(), String::new()]);

    let rows: [(&str, String); 6] = [
        ("Exchange", str_field(output, "exchange")),
        ("Sector", str_field(output, "sector")),
        ("Industry", str_field(output, "industry")),
        ("CEO", str_field(output, "ceo")),
        ("Market cap", format_compact(num_field(output, "marketCap"))),
        ("Avg volume", format_compact(num_field(output, "volume"))),
    ];
    for (label, value) in rows {
        if !value.is_empty() && value != "?" {
            table.add_row(vec![label.to_string(), value]);
        }
    }

    let mut rendered = table.to_string();
    if let Some(description) = output.get("description").and_then(Value::as_str) {
        let summary: String = description.chars().take(280).collect();
        rendered.push('\n');
        rendered.push_str("  ");
        rendered.push_str(&summary);
        if description.chars().count() > 280 {
            rendered.push('…');
        }
    }
    rendered
}

fn render_movers(output: &Value) -> String {
    let empty = Vec::new();
    let movers = output
        .get("movers")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    if movers.is_empty() {
        return "  No movers data".to_string();
    }

    let direction = if str_field(output, "type") == "biggest-losers" {
        "Biggest losers"
    } else {
        "Biggest gainers"
    };

    let mut table = new_table();
    table.set_header(vec![direction, "Price", "Change"]);
    for mover in movers {
        table.add_row(vec![
            Cell::new(format!(
                "{} {}",
                str_field(mover, "symbol"),
                str_field(mover, "name")
            )),
            Cell::new(format_money(num_field(mover, "price"), "USD")),
            Cell::new(format!(
                "{} ({})",
                num_field(mover, "change"),
                format_percent(num_field(mover, "changePercent"))
            )),
        ]);
    }
    table.to_string()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table
}

fn str_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn num_field(value: &Value, field: &str) -> f64 {
    value.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn short_date(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.format("%b %-d %Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_degraded_payload_renders_notice() {
        let output = json!({
            "symbol": "AAPL",
            "price": 0.0,
            "error": "Failed to fetch price"
        });
        let rendered = render_tool_output("stock_price", &output);
        assert!(rendered.contains("⚠"));
        assert!(rendered.contains("AAPL"));
        assert!(rendered.contains("Failed to fetch price"));
        assert!(!rendered.contains("Prev close"));
    }

    #[test]
    fn test_price_card_contains_change() {
        let output = json!({
            "symbol": "TSLA",
            "price": 250.0,
            "currency": "USD",
            "previousClose": 245.0
        });
        let rendered = render_tool_output("stock_price", &output);
        assert!(rendered.contains("TSLA"));
        assert!(rendered.contains("$250.00"));
        assert!(rendered.contains("+2.04%"));
    }

    #[test]
    fn test_chart_renders_sparkline_and_range() {
        let output = json!({
            "symbol": "BTC",
            "prices": [100.0, null, 120.0, 140.0],
            "timestamp": [1_700_000_000, 1_700_086_400, 1_700_172_800, 1_700_259_200],
            "currentPrice": 140.0
        });
        let rendered = render_tool_output("crypto_chart", &output);
        assert!(rendered.contains("BTC"));
        assert!(rendered.contains("▁"));
        assert!(rendered.contains("+40.00%"));
        assert!(rendered.contains("Nov 14 2023"));
    }

    #[test]
    fn test_sentiment_gauge() {
        let output = json!({ "value": 75, "classification": "Greed" });
        let rendered = render_tool_output("crypto_sentiment", &output);
        assert!(rendered.contains("75/100"));
        assert!(rendered.contains("Greed"));
        assert!(rendered.contains("███████████████░░░░░"));
    }

    #[test]
    fn test_empty_news_is_a_sentence_not_a_table() {
        let output = json!({ "query": "NVDA", "news": [] });
        let rendered = render_tool_output("news", &output);
        assert_eq!(rendered, "  No recent news for NVDA");
    }

    #[test]
    fn test_conversion_line() {
        let output = json!({
            "from": "USD",
            "to": "EUR",
            "amount": 100.0,
            "convertedAmount": 92.41,
            "date": "2026-08-28"
        });
        let rendered = render_tool_output("currency_convert", &output);
        assert_eq!(rendered, "  100.00 USD = 92.41 EUR  (rate date 2026-08-28)");
    }

    #[test]
    fn test_unknown_tool_falls_back_to_json() {
        let output = json!({ "custom": true });
        let rendered = render_tool_output("mystery_tool", &output);
        assert!(rendered.contains("\"custom\": true"));
    }
}
