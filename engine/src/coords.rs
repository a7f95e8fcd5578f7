// Coordinate mapper: domain (time, price) <-> pixel (x, y), bound to the data envelope
// of the loaded candles.
use crate::chart::ChartScale;
use crate::error::EngineError;
use serde::Serialize;
use shared::models::{Candle, DomainPoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Time/price envelope of the loaded candle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataBounds {
    pub min_time: f64,
    pub max_time: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl DataBounds {
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }
        let mut bounds = DataBounds {
            min_time: f64::INFINITY,
            max_time: f64::NEG_INFINITY,
            min_price: f64::INFINITY,
            max_price: f64::NEG_INFINITY,
        };
        for candle in candles {
            bounds.min_time = bounds.min_time.min(candle.time as f64);
            bounds.max_time = bounds.max_time.max(candle.time as f64);
            bounds.min_price = bounds.min_price.min(candle.low);
            bounds.max_price = bounds.max_price.max(candle.high);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: DomainPoint) -> bool {
        (self.min_time..=self.max_time).contains(&point.time)
            && (self.min_price..=self.max_price).contains(&point.price)
    }
}

/// A pointer position pulled inside the data envelope, with pixel and domain
/// values derived from each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClampedPointer {
    pub pixel: PixelPoint,
    pub domain: DomainPoint,
}

#[derive(Debug, Default, Clone)]
pub struct CoordinateMapper {
    bounds: Option<DataBounds>,
    suspended: bool,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the envelope in one step and resumes the mapper.
    pub fn install_bounds(&mut self, bounds: Option<DataBounds>) {
        self.bounds = bounds;
        self.suspended = false;
    }

    /// While suspended (a fetch is in flight) every clamping request reports no coordinate.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn bounds(&self) -> Option<DataBounds> {
        if self.suspended {
            None
        } else {
            self.bounds
        }
    }

    pub fn domain_to_pixel(&self, scale: &dyn ChartScale, point: DomainPoint) -> Result<PixelPoint, EngineError> {
        let x = scale.time_to_x(point.time).ok_or(EngineError::NoCoordinate("time not on scale"))?;
        let y = scale.price_to_y(point.price).ok_or(EngineError::NoCoordinate("price not on scale"))?;
        Ok(PixelPoint::new(x, y))
    }

    pub fn pixel_to_domain(&self, scale: &dyn ChartScale, pixel: PixelPoint) -> Result<DomainPoint, EngineError> {
        let time = scale.x_to_time(pixel.x).ok_or(EngineError::NoCoordinate("x not on scale"))?;
        let price = scale.y_to_price(pixel.y).ok_or(EngineError::NoCoordinate("y not on scale"))?;
        Ok(DomainPoint::new(time, price))
    }

    /// Pulls a raw pointer pixel into the rectangle spanned by the data envelope and
    /// returns mutually consistent pixel and domain values.
    pub fn clamp_pointer(&self, scale: &dyn ChartScale, x: f64, y: f64) -> Result<ClampedPointer, EngineError> {
        let bounds = self.bounds().ok_or(EngineError::NoCoordinate("no data bounds installed"))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(EngineError::NoCoordinate("non-finite pointer position"));
        }

        let min_time_x = scale.time_to_x(bounds.min_time).ok_or(EngineError::NoCoordinate("min time not on scale"))?;
        let max_time_x = scale.time_to_x(bounds.max_time).ok_or(EngineError::NoCoordinate("max time not on scale"))?;
        // Price grows upward, pixels grow downward: max price has the smaller y.
        let min_price_y = scale.price_to_y(bounds.min_price).ok_or(EngineError::NoCoordinate("min price not on scale"))?;
        let max_price_y = scale.price_to_y(bounds.max_price).ok_or(EngineError::NoCoordinate("max price not on scale"))?;

        let clamped_x = x.clamp(min_time_x.min(max_time_x), min_time_x.max(max_time_x));
        let clamped_y = y.clamp(max_price_y.min(min_price_y), max_price_y.max(min_price_y));

        let time = scale
            .x_to_time(clamped_x)
            .unwrap_or_else(|| {
                if (clamped_x - min_time_x).abs() <= (clamped_x - max_time_x).abs() {
                    bounds.min_time
                } else {
                    bounds.max_time
                }
            })
            .clamp(bounds.min_time, bounds.max_time);
        let price = scale
            .y_to_price(clamped_y)
            .unwrap_or_else(|| {
                if (clamped_y - min_price_y).abs() <= (clamped_y - max_price_y).abs() {
                    bounds.min_price
                } else {
                    bounds.max_price
                }
            })
            .clamp(bounds.min_price, bounds.max_price);

        // Re-derive the pixel from the clamped domain values so both sides agree.
        let pixel = PixelPoint::new(
            scale.time_to_x(time).unwrap_or(clamped_x),
            scale.price_to_y(price).unwrap_or(clamped_y),
        );

        Ok(ClampedPointer { pixel, domain: DomainPoint::new(time, price) })
    }
}
