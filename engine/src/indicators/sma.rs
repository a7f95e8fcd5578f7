// Simple Moving Average (SMA) indicator implementation
use super::{IndicatorCalculator, IndicatorLine, Series};
use serde_json::Value;
use shared::models::Candle;

/// Trailing arithmetic mean. Cells before `period - 1` carry no value.
pub fn sma(series: &[f64], period: usize) -> Series {
    if period == 0 || series.len() < period {
        return vec![None; series.len()];
    }

    let mut results = vec![None; period - 1];
    results.extend(
        series
            .windows(period)
            .map(|window| Some(window.iter().sum::<f64>() / period as f64)),
    );
    results
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        vec![IndicatorLine::single(sma(&closes, self.period))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{assert_series_eq, create_candle};

    #[test]
    fn test_sma_calculation() {
        let results = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_series_eq(&results, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        assert_eq!(sma(&[1.0, 2.0], 3), vec![None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        assert_series_eq(&sma(&[1.0, 2.0, 3.0], 1), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_and_zero_period() {
        assert!(sma(&[], 3).is_empty());
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn test_sma_zero_is_a_value() {
        // A legitimate zero average must not be confused with "no value".
        let results = sma(&[0.0, 0.0, 0.0], 2);
        assert_eq!(results, vec![None, Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_sma_20_on_50_candles() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64).collect();
        let results = sma(&closes, 20);
        assert_eq!(results.len(), 50);
        assert!(results[..19].iter().all(Option::is_none));
        for i in 19..50 {
            let expected = closes[i - 19..=i].iter().sum::<f64>() / 20.0;
            let got = results[i].expect("defined after warmup");
            assert!((got - expected).abs() < 1e-9, "index {}: {} != {}", i, got, expected);
        }
    }

    #[test]
    fn test_sma_calculator_uses_closes() {
        let candles: Vec<Candle> = [2.0, 4.0, 6.0].iter().map(|&c| create_candle(c)).collect();
        let lines = Sma::new(2).calculate(&candles);
        assert_eq!(lines.len(), 1);
        assert_series_eq(&lines[0].values, &[None, Some(3.0), Some(5.0)]);
    }
}
