//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// API request failed
    #[error("API error: {0}")]
    Api(String),

    /// Invalid symbol or currency code
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Rate limit exceeded for a provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<MarketError> for fingyan_tools::ToolError {
    fn from(err: MarketError) -> Self {
        fingyan_tools::ToolError::ExecutionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::InvalidSymbol("???".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: ???");

        let err = MarketError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "empty chart result".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data not available for AAPL: empty chart result"
        );
    }

    #[test]
    fn test_tool_error_conversion() {
        let err = MarketError::Api("boom".to_string());
        let tool_err: fingyan_tools::ToolError = err.into();
        assert!(tool_err.to_string().contains("API error: boom"));
    }
}
