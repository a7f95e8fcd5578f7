// CSV candle source: `{SYMBOL}_{interval}.csv` files with a
// `time,open,high,low,close,volume` header.
use super::market_data::{normalize_candles, stats_from_candles, FetchRequest, MarketDataProvider};
use crate::error::EngineError;
use chrono::DateTime;
use csv::ReaderBuilder;
use serde::Deserialize;
use shared::models::{Candle, Interval, MarketStats};
use shared::utils::normalize_symbol;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Timestamps above this are taken as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Accepts unix seconds, unix milliseconds, or an RFC 3339 timestamp.
pub fn parse_time(raw: &str) -> Result<i64, EngineError> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(if value.abs() >= MILLIS_THRESHOLD { value / 1000 } else { value });
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp())
        .map_err(|e| EngineError::CsvDataFormatError(format!("Failed to parse time '{}': {}", raw, e)))
}

/// Reads every candle from a CSV stream, sorted and deduplicated by time.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, EngineError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let mut candles = Vec::new();
    for (idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let time = parse_time(&row.time)
            .map_err(|e| EngineError::CsvDataFormatError(format!("line {}: {}", idx + 2, e)))?;
        let volume = row.volume.unwrap_or(0.0);
        if volume < 0.0 {
            return Err(EngineError::CsvDataFormatError(format!("line {}: negative volume {}", idx + 2, volume)));
        }
        candles.push(Candle { time, open: row.open, high: row.high, low: row.low, close: row.close, volume });
    }
    Ok(normalize_candles(candles))
}

#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    dir: PathBuf,
    /// Interval used when stats are requested for a symbol.
    stats_interval: Interval,
}

impl CsvCandleSource {
    pub fn new(dir: impl Into<PathBuf>, stats_interval: Interval) -> Self {
        Self { dir: dir.into(), stats_interval }
    }

    pub fn file_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", normalize_symbol(symbol), interval))
    }

    pub fn load_file(path: &Path) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(path).map_err(|e| {
            EngineError::FetchFailure(format!("Failed to open CSV file '{}': {}", path.display(), e))
        })?;
        read_candles(BufReader::new(file))
    }
}

impl MarketDataProvider for CsvCandleSource {
    async fn fetch_candles(&self, request: &FetchRequest) -> Result<Vec<Candle>, EngineError> {
        let path = self.file_path(&request.symbol, request.interval);
        let mut candles = Self::load_file(&path)?;
        if candles.len() > request.limit {
            candles.drain(..candles.len() - request.limit);
        }
        tracing::info!(path = %path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }

    async fn fetch_stats(&self, symbol: &str) -> Result<MarketStats, EngineError> {
        let candles = Self::load_file(&self.file_path(symbol, self.stats_interval))?;
        stats_from_candles(&candles)
            .ok_or_else(|| EngineError::FetchFailure(format!("No candles for {}", symbol)))
    }
}
