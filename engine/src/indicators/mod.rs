// Technical indicators module
pub mod bbi;
pub mod bollinger;
pub mod catalog;
pub mod ema;
pub mod sar;
pub mod sma;
pub mod volume;

pub use bbi::{bbi, Bbi};
pub use bollinger::{bollinger_bands, Bollinger, BollingerBands};
pub use catalog::IndicatorCatalog;
pub use ema::{ema, Ema};
pub use sar::{parabolic_sar, ParabolicSar};
pub use sma::{sma, Sma};
pub use volume::{Volume, VolumeAverage};

use crate::error::EngineError;
use serde_json::Value;
use shared::models::{Candle, Indicator, IndicatorCategory, IndicatorType};

/// One value per input bar; `None` where the lookback is not yet satisfied.
pub type Series = Vec<Option<f64>>;

/// A named output line of an indicator (`value`, or `upper`/`middle`/`lower` for bands).
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorLine {
    pub key: &'static str,
    pub values: Series,
}

impl IndicatorLine {
    pub fn new(key: &'static str, values: Series) -> Self {
        Self { key, values }
    }

    pub fn single(values: Series) -> Self {
        Self::new("value", values)
    }
}

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value;
    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine>;
}

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD_DEV: f64 = 2.0;
pub const DEFAULT_VOLUME_PERIOD: usize = 5;

/// Builds the calculator for a catalog entry, validating its settings.
pub fn build_calculator(indicator: &Indicator) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let settings = &indicator.settings;
    let period = settings.period.unwrap_or(match indicator.kind {
        IndicatorType::VOL => DEFAULT_VOLUME_PERIOD,
        _ => DEFAULT_PERIOD,
    });
    if period == 0 {
        return Err(EngineError::IndicatorError(format!(
            "Indicator '{}' period cannot be 0",
            indicator.id
        )));
    }

    let calculator: Box<dyn IndicatorCalculator> = match indicator.kind {
        // On the volume pane a moving average is taken over volume.
        IndicatorType::MA | IndicatorType::SMA if indicator.category == IndicatorCategory::Sub => {
            Box::new(VolumeAverage::new(period))
        }
        // MA is the dashboard's alias for a simple moving average.
        IndicatorType::MA | IndicatorType::SMA => Box::new(Sma::new(period)),
        IndicatorType::EMA => Box::new(Ema::new(period)),
        IndicatorType::BOLL => {
            let std_dev = settings.std_dev.unwrap_or(DEFAULT_STD_DEV);
            if !(std_dev > 0.0) {
                return Err(EngineError::IndicatorError(format!(
                    "Indicator '{}' stdDev must be positive, got {}",
                    indicator.id, std_dev
                )));
            }
            Box::new(Bollinger::new(period, std_dev))
        }
        IndicatorType::SAR => Box::new(ParabolicSar::default()),
        IndicatorType::BBI => Box::new(Bbi),
        IndicatorType::VOL => Box::new(Volume::new(period)),
    };
    Ok(calculator)
}

#[cfg(test)]
pub(crate) mod test_support {
    use shared::models::Candle;

    pub fn create_candle(close: f64) -> Candle {
        Candle { time: 0, open: close, high: close, low: close, close, volume: 0.0 }
    }

    pub fn assert_series_eq(a: &[Option<f64>], b: &[Option<f64>]) {
        assert_eq!(a.len(), b.len(), "Series differ in length");
        for (i, (val_a, val_b)) in a.iter().zip(b.iter()).enumerate() {
            match (val_a, val_b) {
                (None, None) => {}
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, x, y),
                _ => panic!("Mismatch at index {}: {:?} != {:?}", i, val_a, val_b),
            }
        }
    }
}
