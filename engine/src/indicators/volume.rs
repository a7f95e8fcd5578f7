// Volume bars plus their moving average (sub-pane indicator).
use super::{sma::sma, IndicatorCalculator, IndicatorLine};
use serde_json::Value;
use shared::models::Candle;

pub struct Volume {
    period: usize,
}

impl Volume {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl IndicatorCalculator for Volume {
    fn name(&self) -> &str {
        "VOL"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let volumes: Vec<f64> = data.iter().map(|c| c.volume).collect();
        let average = sma(&volumes, self.period);
        vec![
            IndicatorLine::new("volume", volumes.into_iter().map(Some).collect()),
            IndicatorLine::new("ma", average),
        ]
    }
}

/// Moving average of volume alone; what `MA` means on the volume pane.
pub struct VolumeAverage {
    period: usize,
}

impl VolumeAverage {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl IndicatorCalculator for VolumeAverage {
    fn name(&self) -> &str {
        "VOL MA"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "source": "volume" })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<IndicatorLine> {
        let volumes: Vec<f64> = data.iter().map(|c| c.volume).collect();
        vec![IndicatorLine::single(sma(&volumes, self.period))]
    }
}
