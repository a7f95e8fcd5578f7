// Engine settings: embedded defaults, optionally overridden by a JSON file.
use crate::error::EngineError;
use crate::indicators::catalog::default_indicators;
use serde::{Deserialize, Serialize};
use shared::models::{Indicator, Interval};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    pub market_data: MarketDataSettings,
    pub chart: ChartSettings,
    pub drawing: DrawingSettings,
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarketDataSettings {
    pub base_url: String,
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
    pub request_timeout_secs: u64,
    /// When set, candles are read from `{SYMBOL}_{interval}.csv` files here instead of the REST API.
    #[serde(default)]
    pub csv_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    /// Fraction of the price range added above and below the data when fitting.
    pub price_margin: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DrawingSettings {
    pub eraser_threshold_px: f64,
    #[serde(default)]
    pub default_color: Option<String>,
    pub default_text_label: String,
    pub preview_color: String,
    pub line_width: f64,
    pub font_size: f64,
}

impl EngineSettings {
    /// Settings shipped with the binary.
    pub fn load_default() -> Result<Self, EngineError> {
        Self::from_json(DEFAULT_CONFIG)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the engine cannot run with. Call again after applying overrides.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.market_data.limit == 0 {
            return Err(EngineError::ConfigError("market_data.limit must be positive".to_string()));
        }
        if self.drawing.eraser_threshold_px <= 0.0 {
            return Err(EngineError::ConfigError("drawing.eraser_threshold_px must be positive".to_string()));
        }
        if self.chart.width <= 0.0 || self.chart.height <= 0.0 {
            return Err(EngineError::ConfigError("chart size must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            market_data: MarketDataSettings::default(),
            chart: ChartSettings::default(),
            drawing: DrawingSettings::default(),
            indicators: default_indicators(),
        }
    }
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        MarketDataSettings {
            base_url: "https://api.binance.com".to_string(),
            symbol: "BTC/USDT".to_string(),
            interval: Interval::Hour1,
            limit: 100,
            request_timeout_secs: 10,
            csv_dir: None,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings { width: 1200.0, height: 600.0, price_margin: 0.1 }
    }
}

impl Default for DrawingSettings {
    fn default() -> Self {
        DrawingSettings {
            eraser_threshold_px: 10.0,
            default_color: Some("#2196F3".to_string()),
            default_text_label: "Text".to_string(),
            preview_color: "#9E9E9E".to_string(),
            line_width: 2.0,
            font_size: 12.0,
        }
    }
}
