//! Typed clients for the external finance APIs

pub mod alternative_me;
pub mod coingecko;
pub mod fmp;
pub mod frankfurter;
pub mod yahoo;

pub use alternative_me::FearGreedClient;
pub use coingecko::CoinGeckoClient;
pub use fmp::{FmpClient, MoverDirection};
pub use frankfurter::FrankfurterClient;
pub use yahoo::YahooClient;
