// Linear time/price viewport over a pixel rectangle.
use super::ChartScale;
use serde::{Deserialize, Serialize};
use shared::models::Candle;

/// Visible window of the chart. X grows with time to the right, Y grows downward
/// while price grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearViewport {
    pub width: f64,
    pub height: f64,
    pub time_from: f64,
    pub time_to: f64,
    pub price_low: f64,
    pub price_high: f64,
}

impl LinearViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            time_from: 0.0,
            time_to: 0.0,
            price_low: 0.0,
            price_high: 0.0,
        }
    }

    pub fn with_ranges(mut self, time_from: f64, time_to: f64, price_low: f64, price_high: f64) -> Self {
        self.time_from = time_from;
        self.time_to = time_to;
        self.price_low = price_low;
        self.price_high = price_high;
        self
    }

    /// Shows every candle, padding the price range by `margin` (fraction of the range).
    pub fn fit_to(&mut self, candles: &[Candle], margin: f64) {
        let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
            return;
        };
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let pad = ((high - low) * margin).max(f64::EPSILON);

        self.time_from = first.time as f64;
        self.time_to = if last.time > first.time { last.time as f64 } else { first.time as f64 + 1.0 };
        self.price_low = low - pad;
        self.price_high = high + pad;
    }

    /// Shifts the visible window by `seconds`; positive values reveal later bars.
    pub fn pan_seconds(&mut self, seconds: f64) {
        self.time_from += seconds;
        self.time_to += seconds;
    }

    pub fn pan_bars(&mut self, bars: f64, bar_seconds: i64) {
        self.pan_seconds(bars * bar_seconds as f64);
    }

    /// Scales the visible time span around pixel `x`; `factor > 1` zooms in.
    pub fn zoom_at(&mut self, x: f64, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let Some(anchor) = self.x_to_time(x) else {
            return;
        };
        self.time_from = anchor - (anchor - self.time_from) / factor;
        self.time_to = anchor + (self.time_to - anchor) / factor;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn time_span(&self) -> Option<f64> {
        let span = self.time_to - self.time_from;
        (self.width > 0.0 && span > 0.0 && span.is_finite()).then_some(span)
    }

    fn price_span(&self) -> Option<f64> {
        let span = self.price_high - self.price_low;
        (self.height > 0.0 && span > 0.0 && span.is_finite()).then_some(span)
    }
}

impl Default for LinearViewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl ChartScale for LinearViewport {
    fn time_to_x(&self, time: f64) -> Option<f64> {
        let span = self.time_span()?;
        time.is_finite().then(|| (time - self.time_from) / span * self.width)
    }

    fn price_to_y(&self, price: f64) -> Option<f64> {
        let span = self.price_span()?;
        price.is_finite().then(|| (self.price_high - price) / span * self.height)
    }

    fn x_to_time(&self, x: f64) -> Option<f64> {
        let span = self.time_span()?;
        x.is_finite().then(|| self.time_from + x / self.width * span)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        let span = self.price_span()?;
        y.is_finite().then(|| self.price_high - y / self.height * span)
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}
