use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar. `time` is the bar's open time in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// 24h ticker statistics for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    #[serde(rename = "high24h")]
    pub high_24h: f64,
    #[serde(rename = "low24h")]
    pub low_24h: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    #[default]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            Interval::Minute1 => 60,
            Interval::Minute5 => 300,
            Interval::Minute15 => 900,
            Interval::Hour1 => 3_600,
            Interval::Hour4 => 14_400,
            Interval::Day1 => 86_400,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::Minute1),
            "5m" => Ok(Interval::Minute5),
            "15m" => Ok(Interval::Minute15),
            "1h" => Ok(Interval::Hour1),
            "4h" => Ok(Interval::Hour4),
            "1d" => Ok(Interval::Day1),
            other => Err(format!("unknown interval '{}'", other)),
        }
    }
}

/// A position in chart data space: time in unix seconds (fractional between bars) and price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPoint {
    pub time: f64,
    pub price: f64,
}

impl DomainPoint {
    pub fn new(time: f64, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    Trend,
    Horizontal,
    Vertical,
    Rectangle,
    Circle,
    Triangle,
    Fibonacci,
    Text,
    Measure,
}

impl DrawingKind {
    /// Number of anchor points a committed drawing of this kind carries.
    pub fn point_count(&self) -> usize {
        match self {
            DrawingKind::Horizontal | DrawingKind::Vertical | DrawingKind::Text => 1,
            DrawingKind::Trend
            | DrawingKind::Rectangle
            | DrawingKind::Circle
            | DrawingKind::Triangle
            | DrawingKind::Fibonacci
            | DrawingKind::Measure => 2,
        }
    }
}

/// A persisted chart annotation. Points are stored in domain space only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DrawingKind,
    pub points: Vec<DomainPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorType {
    MA,
    EMA,
    SMA,
    BOLL,
    SAR,
    BBI,
    VOL,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorType::MA => "MA",
            IndicatorType::EMA => "EMA",
            IndicatorType::SMA => "SMA",
            IndicatorType::BOLL => "BOLL",
            IndicatorType::SAR => "SAR",
            IndicatorType::BBI => "BBI",
            IndicatorType::VOL => "VOL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorCategory {
    Main,
    Sub,
}

/// Tunable settings of an indicator. Every field is optional so the same type
/// doubles as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

impl IndicatorSettings {
    /// Overlays every field set in `patch` onto `self`.
    pub fn merge(&mut self, patch: IndicatorSettings) {
        if patch.period.is_some() {
            self.period = patch.period;
        }
        if patch.color.is_some() {
            self.color = patch.color;
        }
        if patch.line_width.is_some() {
            self.line_width = patch.line_width;
        }
        if patch.std_dev.is_some() {
            self.std_dev = patch.std_dev;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IndicatorType,
    pub enabled: bool,
    pub category: IndicatorCategory,
    #[serde(default)]
    pub settings: IndicatorSettings,
}

impl Indicator {
    /// Legend label, e.g. `MA(20)` or `SAR`.
    pub fn label(&self) -> String {
        match self.kind {
            IndicatorType::MA | IndicatorType::EMA | IndicatorType::SMA | IndicatorType::BOLL => {
                format!("{}({})", self.kind, self.settings.period.unwrap_or(20))
            }
            _ => self.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_serializes_type_tag_in_lowercase() {
        let drawing = Drawing {
            id: "d1".to_string(),
            kind: DrawingKind::Fibonacci,
            points: vec![DomainPoint::new(1.0, 2.0), DomainPoint::new(3.0, 4.0)],
            color: None,
            label: None,
        };
        let json = serde_json::to_value(&drawing).unwrap();
        assert_eq!(json["type"], "fibonacci");
        assert!(json.get("color").is_none());
    }

    #[test]
    fn interval_parses_binance_notation() {
        assert_eq!("4h".parse::<Interval>().unwrap(), Interval::Hour4);
        assert_eq!(Interval::Day1.seconds(), 86_400);
        assert!("2h".parse::<Interval>().is_err());
    }

    #[test]
    fn settings_merge_keeps_unset_fields() {
        let mut settings = IndicatorSettings {
            period: Some(20),
            color: Some("#9C27B0".to_string()),
            line_width: Some(1),
            std_dev: Some(2.0),
        };
        settings.merge(IndicatorSettings { period: Some(10), ..Default::default() });
        assert_eq!(settings.period, Some(10));
        assert_eq!(settings.std_dev, Some(2.0));
        assert_eq!(settings.color.as_deref(), Some("#9C27B0"));
    }

    #[test]
    fn label_includes_period_for_moving_averages() {
        let indicator = Indicator {
            id: "boll".to_string(),
            kind: IndicatorType::BOLL,
            enabled: true,
            category: IndicatorCategory::Main,
            settings: IndicatorSettings { period: Some(20), ..Default::default() },
        };
        assert_eq!(indicator.label(), "BOLL(20)");
    }
}
