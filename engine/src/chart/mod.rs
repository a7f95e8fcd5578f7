// Seams to the chart rendering widget (time/price scales and series primitives),
// plus a headless implementation used by tests and the binary.
pub mod series;
pub mod viewport;

pub use series::{LineSeries, SeriesStore, SeriesStyle};
pub use viewport::LinearViewport;

use shared::models::Candle;

/// Price padding applied when the headless chart fits itself to new candles.
pub const DEFAULT_PRICE_MARGIN: f64 = 0.1;

/// The widget's own time/price scale. Every conversion may fail to resolve,
/// e.g. on a zero-width viewport.
pub trait ChartScale {
    fn time_to_x(&self, time: f64) -> Option<f64>;
    fn price_to_y(&self, price: f64) -> Option<f64>;
    fn x_to_time(&self, x: f64) -> Option<f64>;
    fn y_to_price(&self, y: f64) -> Option<f64>;
    /// Pixel size of the plotting area as (width, height).
    fn size(&self) -> (f64, f64);
}

/// Series primitives of the widget.
pub trait SeriesSink {
    /// Replaces the main candlestick series and fits the visible range to it.
    fn set_candles(&mut self, candles: &[Candle]);
    fn set_line_series(&mut self, series_id: &str, points: Vec<(i64, f64)>, style: SeriesStyle);
    fn remove_series(&mut self, series_id: &str);
    fn set_series_visible(&mut self, series_id: &str, visible: bool);
}

pub trait ChartWidget: ChartScale + SeriesSink {}

impl<T: ChartScale + SeriesSink> ChartWidget for T {}

/// A viewport with series storage; what the real widget provides, minus the pixels.
#[derive(Debug, Clone)]
pub struct HeadlessChart {
    pub viewport: LinearViewport,
    pub series: SeriesStore,
    pub price_margin: f64,
}

impl HeadlessChart {
    pub fn new(viewport: LinearViewport) -> Self {
        Self { viewport, series: SeriesStore::default(), price_margin: DEFAULT_PRICE_MARGIN }
    }

    pub fn with_price_margin(mut self, price_margin: f64) -> Self {
        self.price_margin = price_margin;
        self
    }
}

impl Default for HeadlessChart {
    fn default() -> Self {
        Self::new(LinearViewport::default())
    }
}

impl ChartScale for HeadlessChart {
    fn time_to_x(&self, time: f64) -> Option<f64> {
        self.viewport.time_to_x(time)
    }

    fn price_to_y(&self, price: f64) -> Option<f64> {
        self.viewport.price_to_y(price)
    }

    fn x_to_time(&self, x: f64) -> Option<f64> {
        self.viewport.x_to_time(x)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        self.viewport.y_to_price(y)
    }

    fn size(&self) -> (f64, f64) {
        self.viewport.size()
    }
}

impl SeriesSink for HeadlessChart {
    fn set_candles(&mut self, candles: &[Candle]) {
        self.series.set_candles(candles);
        self.viewport.fit_to(candles, self.price_margin);
    }

    fn set_line_series(&mut self, series_id: &str, points: Vec<(i64, f64)>, style: SeriesStyle) {
        self.series.set_line_series(series_id, points, style)
    }

    fn remove_series(&mut self, series_id: &str) {
        self.series.remove_series(series_id)
    }

    fn set_series_visible(&mut self, series_id: &str, visible: bool) {
        self.series.set_series_visible(series_id, visible)
    }
}
