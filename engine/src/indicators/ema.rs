// Exponential Moving Average (EMA) indicator implementation
use super::{sma::sma, IndicatorCalculator, IndicatorLine, Series};
use serde_json::Value;
use shared::models::Candle;

/// EMA seeded with the SMA of the first `period` values.
pub fn ema(series: &[f64], period: usize) -> Series {
    if period == 0 || series.len() < period {
        return vec![None; series.len()];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut results = vec![None; period - 1];

    // Seed with the same window mean `sma` produces so both agree exactly at period - 1.
    let mut previous_ema = match sma(&series[..period], period).last().copied().flatten() {
        Some(seed) => seed,
        None => return vec![None; series.len()],
    };
    results.push(Some(previous_ema));

    for value in series.iter().skip(period) {
        let ema = (value - previous_ema) * multiplier + previous_ema;
        results.push(Some(ema));
        previous_ema = ema;
    }
    results
}

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        vec![IndicatorLine::single(ema(&closes, self.period))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::create_candle;

    #[test]
    fn test_ema_calculation() {
        let candles: Vec<Candle> = [10.0, 11.0, 12.0, 13.0, 14.0].iter().map(|&c| create_candle(c)).collect();
        let results = Ema::new(3).calculate(&candles).remove(0).values;
        // Seed: (10+11+12)/3 = 11.0
        // 13: (13 - 11) * 0.5 + 11 = 12.0
        // 14: (14 - 12) * 0.5 + 12 = 13.0
        assert_eq!(results.len(), 5);
        assert_eq!(results[0], None);
        assert_eq!(results[1], None);
        assert_eq!(results[2], Some(11.0));
        assert_eq!(results[3], Some(12.0));
        assert_eq!(results[4], Some(13.0));
    }

    #[test]
    fn test_ema_seed_equals_sma_exactly() {
        let series: Vec<f64> = (0..40).map(|i| 42_000.0 + (i as f64 * 1.3).cos() * 250.0).collect();
        for period in [1, 2, 5, 12, 26, 40] {
            let e = ema(&series, period);
            let s = sma(&series, period);
            assert_eq!(e[period - 1], s[period - 1], "period {}", period);
        }
    }

    #[test]
    fn test_ema_insufficient_data() {
        assert_eq!(ema(&[1.0, 2.0], 5), vec![None, None]);
        assert!(ema(&[], 5).is_empty());
    }
}
