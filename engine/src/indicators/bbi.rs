// Bull and Bear Index: mean of the 3, 6, 12 and 24 period SMAs.
use super::{sma::sma, IndicatorCalculator, IndicatorLine, Series};
use serde_json::Value;
use shared::models::Candle;

pub const BBI_PERIODS: [usize; 4] = [3, 6, 12, 24];

pub fn bbi(series: &[f64]) -> Series {
    let averages: Vec<Series> = BBI_PERIODS.iter().map(|&p| sma(series, p)).collect();

    (0..series.len())
        .map(|i| {
            averages
                .iter()
                .map(|ma| ma[i])
                .sum::<Option<f64>>()
                .map(|total| total / BBI_PERIODS.len() as f64)
        })
        .collect()
}

pub struct Bbi;

impl IndicatorCalculator for Bbi {
    fn name(&self) -> &str {
        "BBI"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "periods": BBI_PERIODS })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        vec![IndicatorLine::single(bbi(&closes))]
    }
}
