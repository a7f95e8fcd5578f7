// Bollinger Bands indicator implementation
use super::{sma::sma, IndicatorCalculator, IndicatorLine, Series};
use serde_json::Value;
use shared::models::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Middle band is the SMA; the outer bands sit `multiplier` population
/// standard deviations away over the same trailing window.
pub fn bollinger_bands(series: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let middle = sma(series, period);
    let mut upper = Vec::with_capacity(series.len());
    let mut lower = Vec::with_capacity(series.len());

    for (i, mean) in middle.iter().enumerate() {
        match mean {
            Some(mean) => {
                let window = &series[i + 1 - period..=i];
                let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
                let offset = variance.sqrt() * multiplier;
                upper.push(Some(mean + offset));
                lower.push(Some(mean - offset));
            }
            None => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerBands { upper, middle, lower }
}

pub struct Bollinger {
    name: String,
    period: usize,
    std_dev: f64,
}

impl Bollinger {
    pub fn new(period: usize, std_dev: f64) -> Self {
        Self {
            name: format!("BOLL({})", period),
            period,
            std_dev,
        }
    }
}

impl IndicatorCalculator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "stdDev": self.std_dev })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        let bands = bollinger_bands(&closes, self.period, self.std_dev);
        vec![
            IndicatorLine::new("upper", bands.upper),
            IndicatorLine::new("middle", bands.middle),
            IndicatorLine::new("lower", bands.lower),
        ]
    }
}
