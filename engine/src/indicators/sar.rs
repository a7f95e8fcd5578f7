// Parabolic SAR (stop and reverse) indicator implementation
use super::{IndicatorCalculator, IndicatorLine, Series};
use serde_json::Value;
use shared::models::Candle;

pub const DEFAULT_ACCELERATION: f64 = 0.02;
pub const DEFAULT_MAX_ACCELERATION: f64 = 0.2;

pub fn parabolic_sar(candles: &[Candle], acceleration: f64, max_acceleration: f64) -> Series {
    if candles.len() < 2 {
        return vec![None; candles.len()];
    }

    let mut is_uptrend = candles[1].close > candles[0].close;
    let mut sar = if is_uptrend { candles[0].low } else { candles[0].high };
    let mut ep = if is_uptrend { candles[0].high } else { candles[0].low };
    let mut af = acceleration;

    let mut results = Vec::with_capacity(candles.len());
    results.push(None);

    for candle in &candles[1..] {
        results.push(Some(sar));

        sar += af * (ep - sar);

        if is_uptrend {
            if candle.low < sar {
                is_uptrend = false;
                sar = ep;
                ep = candle.low;
                af = acceleration;
            } else if candle.high > ep {
                ep = candle.high;
                af = (af + acceleration).min(max_acceleration);
            }
        } else if candle.high > sar {
            is_uptrend = true;
            sar = ep;
            ep = candle.high;
            af = acceleration;
        } else if candle.low < ep {
            ep = candle.low;
            af = (af + acceleration).min(max_acceleration);
        }
    }
    results
}

pub struct ParabolicSar {
    acceleration: f64,
    max_acceleration: f64,
}

impl ParabolicSar {
    pub fn new(acceleration: f64, max_acceleration: f64) -> Self {
        Self { acceleration, max_acceleration }
    }
}

impl Default for ParabolicSar {
    fn default() -> Self {
        Self::new(DEFAULT_ACCELERATION, DEFAULT_MAX_ACCELERATION)
    }
}

impl IndicatorCalculator for ParabolicSar {
    fn name(&self) -> &str {
        "SAR"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "acceleration": self.acceleration, "maxAcceleration": self.max_acceleration })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        vec![IndicatorLine::single(parabolic_sar(data, self.acceleration, self.max_acceleration))]
    }
}
