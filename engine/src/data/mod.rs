// Market data: provider contract, fetch sequencing, and the concrete sources.
pub mod binance;
pub mod csv_parser;
pub mod market_data;

pub use binance::BinanceClient;
pub use csv_parser::CsvCandleSource;
pub use market_data::{
    normalize_candles, stats_from_candles, FetchRequest, FetchSequencer, FetchTicket, MarketDataProvider,
};

use crate::config::settings::MarketDataSettings;
use crate::error::EngineError;
use shared::models::{Candle, MarketStats};

/// Provider picked from settings: a CSV directory when one is configured, Binance otherwise.
#[derive(Debug, Clone)]
pub enum MarketDataSource {
    Binance(BinanceClient),
    Csv(CsvCandleSource),
}

impl MarketDataSource {
    pub fn from_settings(settings: &MarketDataSettings) -> Result<Self, EngineError> {
        match &settings.csv_dir {
            Some(dir) => Ok(MarketDataSource::Csv(CsvCandleSource::new(dir, settings.interval))),
            None => Ok(MarketDataSource::Binance(BinanceClient::new(settings)?)),
        }
    }
}

impl MarketDataProvider for MarketDataSource {
    async fn fetch_candles(&self, request: &FetchRequest) -> Result<Vec<Candle>, EngineError> {
        match self {
            MarketDataSource::Binance(client) => client.fetch_candles(request).await,
            MarketDataSource::Csv(source) => source.fetch_candles(request).await,
        }
    }

    async fn fetch_stats(&self, symbol: &str) -> Result<MarketStats, EngineError> {
        match self {
            MarketDataSource::Binance(client) => client.fetch_stats(symbol).await,
            MarketDataSource::Csv(source) => source.fetch_stats(symbol).await,
        }
    }
}
