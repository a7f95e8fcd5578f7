// Binance spot REST client: klines and 24h ticker statistics.
use super::market_data::{normalize_candles, FetchRequest, MarketDataProvider};
use crate::config::settings::MarketDataSettings;
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::{Candle, MarketStats};
use shared::utils::normalize_symbol;
use std::time::Duration;

/// Binance caps a single klines request at this many bars.
pub const MAX_KLINES_LIMIT: usize = 1000;

fn de_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// One row of `/api/v3/klines`: open time in ms, decimal strings for prices.
#[derive(Deserialize, Debug, Clone)]
struct FetchedKline(
    i64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    i64,
    String,
    u64,
    String,
    String,
    String,
);

impl From<FetchedKline> for Candle {
    fn from(kline: FetchedKline) -> Self {
        let FetchedKline(
            open_time,
            open,
            high,
            low,
            close,
            volume,
            _close_time,
            _quote_asset_volume,
            _number_of_trades,
            _taker_buy_base_asset_volume,
            _taker_buy_quote_asset_volume,
            _ignore,
        ) = kline;
        Candle { time: open_time / 1000, open, high, low, close, volume }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FetchedTicker {
    #[serde(deserialize_with = "de_string_to_f64")]
    last_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    price_change: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    price_change_percent: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    high_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    low_price: f64,
    #[serde(deserialize_with = "de_string_to_f64")]
    volume: f64,
}

impl From<FetchedTicker> for MarketStats {
    fn from(t: FetchedTicker) -> Self {
        MarketStats {
            current_price: t.last_price,
            price_change: t.price_change,
            price_change_percent: t.price_change_percent,
            high_24h: t.high_price,
            low_24h: t.low_price,
            volume_24h: t.volume,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(settings: &MarketDataSettings) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self { http, base_url: settings.base_url.trim_end_matches('/').to_string() })
    }

    pub fn klines_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            normalize_symbol(&request.symbol),
            request.interval,
            request.limit.clamp(1, MAX_KLINES_LIMIT)
        )
    }

    pub fn ticker_url(&self, symbol: &str) -> String {
        format!("{}/api/v3/ticker/24hr?symbol={}", self.base_url, normalize_symbol(symbol))
    }

    async fn get_text(&self, url: &str) -> Result<String, EngineError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::FetchFailure(format!("{} returned {}: {}", url, status, body)));
        }
        Ok(response.text().await?)
    }
}

pub fn parse_klines(body: &str) -> Result<Vec<Candle>, EngineError> {
    let fetched: Vec<FetchedKline> = serde_json::from_str(body)?;
    Ok(normalize_candles(fetched.into_iter().map(Candle::from).collect()))
}

pub fn parse_ticker(body: &str) -> Result<MarketStats, EngineError> {
    let fetched: FetchedTicker = serde_json::from_str(body)?;
    Ok(fetched.into())
}

impl MarketDataProvider for BinanceClient {
    async fn fetch_candles(&self, request: &FetchRequest) -> Result<Vec<Candle>, EngineError> {
        let url = self.klines_url(request);
        tracing::debug!(url = %url, "Fetching klines");
        let candles = parse_klines(&self.get_text(&url).await?)?;
        tracing::info!(symbol = %request.symbol, interval = %request.interval, count = candles.len(), "Fetched candles");
        Ok(candles)
    }

    async fn fetch_stats(&self, symbol: &str) -> Result<MarketStats, EngineError> {
        let url = self.ticker_url(symbol);
        tracing::debug!(url = %url, "Fetching 24h ticker");
        parse_ticker(&self.get_text(&url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Interval;

    const KLINES: &str = r#"[
        [1700003600000, "50100.5", "50200.0", "50000.0", "50150.25", "12.5", 1700007199999, "626878.1", 321, "6.1", "305000.0", "0"],
        [1700000000000, "50000.0", "50150.0", "49900.0", "50100.5", "10.0", 1700003599999, "500000.0", 300, "5.0", "250000.0", "0"]
    ]"#;

    #[test]
    fn test_parse_klines_converts_ms_and_sorts() {
        let candles = parse_klines(KLINES).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_700_000_000);
        assert_eq!(candles[1].time, 1_700_003_600);
        assert_eq!(candles[1].close, 50150.25);
        assert_eq!(candles[1].volume, 12.5);
    }

    #[test]
    fn test_parse_klines_rejects_bad_numbers() {
        let body = r#"[[1700000000000, "abc", "1", "1", "1", "1", 1, "0", 1, "0", "0", "0"]]"#;
        assert!(matches!(parse_klines(body), Err(EngineError::JsonError { .. })));
    }

    #[test]
    fn test_parse_ticker() {
        let body = r#"{"symbol":"BTCUSDT","priceChange":"-120.50","priceChangePercent":"-0.24",
            "lastPrice":"50010.00","highPrice":"50500.00","lowPrice":"49800.00","volume":"1234.5"}"#;
        let stats = parse_ticker(body).unwrap();
        assert_eq!(stats.current_price, 50010.0);
        assert_eq!(stats.price_change, -120.5);
        assert_eq!(stats.high_24h, 50500.0);
        assert_eq!(stats.volume_24h, 1234.5);
    }

    #[test]
    fn test_urls_normalise_symbol() {
        let client = BinanceClient::new(&MarketDataSettings::default()).unwrap();
        let request = FetchRequest::new("BTC/USDT", Interval::Hour1, 5_000);
        assert_eq!(
            client.klines_url(&request),
            "https://api.binance.com/api/v3/klines?symbol=BTCUSDT&interval=1h&limit=1000"
        );
        assert_eq!(client.ticker_url("eth/usdt"), "https://api.binance.com/api/v3/ticker/24hr?symbol=ETHUSDT");
    }
}
