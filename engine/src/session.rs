// Chart session: the single-threaded owner of candles, mapper, drawings,
// indicators and the overlay. Every UI event goes through here.
use crate::chart::ChartWidget;
use crate::config::settings::EngineSettings;
use crate::coords::{CoordinateMapper, DataBounds};
use crate::data::{normalize_candles, FetchRequest, FetchSequencer, FetchTicket, MarketDataProvider};
use crate::drawing::{DrawingCollection, DrawingController, DrawingTool, PointerOutcome};
use crate::error::EngineError;
use crate::indicators::IndicatorCatalog;
use crate::overlay::{compute_sub_indicators, ComputedIndicator, IndicatorOverlayController, LegendEntry};
use crate::render::{OverlayRenderer, OverlaySurface, RedrawHandle, RenderReport};
use shared::models::{Candle, IndicatorSettings, MarketStats};
use std::collections::BTreeMap;

pub struct ChartSession<W: ChartWidget, S: OverlaySurface> {
    chart: W,
    surface: S,
    mapper: CoordinateMapper,
    drawings: DrawingController,
    renderer: OverlayRenderer,
    catalog: IndicatorCatalog,
    overlay: IndicatorOverlayController,
    sequencer: FetchSequencer,
    candles: Vec<Candle>,
    request: Option<FetchRequest>,
    stats: Option<MarketStats>,
}

impl<W: ChartWidget, S: OverlaySurface> ChartSession<W, S> {
    pub fn new(chart: W, surface: S, settings: &EngineSettings) -> Self {
        Self {
            chart,
            surface,
            mapper: CoordinateMapper::new(),
            drawings: DrawingController::new(settings.drawing.clone()),
            renderer: OverlayRenderer::new(settings.drawing.clone()),
            catalog: IndicatorCatalog::new(settings.indicators.clone()),
            overlay: IndicatorOverlayController::new(),
            sequencer: FetchSequencer::new(),
            candles: Vec::new(),
            request: None,
            stats: None,
        }
    }

    // --- market data ---

    /// Starts a fetch. Until it settles, pointer-driven drawing is a no-op and
    /// any earlier outstanding fetch is superseded.
    pub fn begin_fetch(&mut self, request: &FetchRequest) -> FetchTicket {
        let ticket = self.sequencer.begin();
        self.mapper.suspend();
        if self.drawings.cancel_gesture() {
            self.redraw();
        }
        tracing::debug!(ticket = ticket.id(), symbol = %request.symbol, interval = %request.interval, "Fetch started");
        ticket
    }

    /// Settles a fetch. The latest ticket installs candles, bounds, indicator
    /// series and a redraw in one step; a failure restores the previous state;
    /// a superseded ticket is dropped with `StaleFetchDiscarded`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        request: FetchRequest,
        result: Result<Vec<Candle>, EngineError>,
    ) -> Result<usize, EngineError> {
        if let Err(e) = self.sequencer.settle(ticket) {
            tracing::debug!(ticket = ticket.id(), error = %e, "Discarding stale fetch result");
            return Err(e);
        }

        let candles = match result {
            Ok(candles) => normalize_candles(candles),
            Err(e) => {
                tracing::warn!(symbol = %request.symbol, interval = %request.interval, error = %e, "Fetch failed; keeping previous data");
                self.mapper.resume();
                return Err(e);
            }
        };

        self.chart.set_candles(&candles);
        self.mapper.install_bounds(DataBounds::from_candles(&candles));
        self.overlay.recompute(&self.catalog, &candles, &mut self.chart);
        tracing::info!(symbol = %request.symbol, interval = %request.interval, count = candles.len(), "Installed candles");
        self.candles = candles;
        self.request = Some(request);
        self.redraw();
        Ok(self.candles.len())
    }

    /// Fetches and installs candles for `request`.
    pub async fn load<P: MarketDataProvider>(&mut self, provider: &P, request: FetchRequest) -> Result<usize, EngineError> {
        let ticket = self.begin_fetch(&request);
        let result = provider.fetch_candles(&request).await;
        self.complete_fetch(ticket, request, result)
    }

    pub async fn refresh_stats<P: MarketDataProvider>(&mut self, provider: &P, symbol: &str) -> Result<MarketStats, EngineError> {
        let stats = provider.fetch_stats(symbol).await?;
        self.stats = Some(stats);
        Ok(stats)
    }

    pub fn is_fetching(&self) -> bool {
        self.sequencer.is_in_flight()
    }

    // --- pointer events ---

    pub fn pointer_down(&mut self, x: f64, y: f64) -> PointerOutcome {
        let outcome = self.drawings.pointer_down(&self.mapper, &self.chart, x, y);
        self.after_pointer(outcome)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> PointerOutcome {
        let outcome = self.drawings.pointer_move(&self.mapper, &self.chart, x, y);
        self.after_pointer(outcome)
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        let outcome = self.drawings.pointer_up();
        self.after_pointer(outcome)
    }

    pub fn pointer_leave(&mut self) -> PointerOutcome {
        let outcome = self.drawings.pointer_leave();
        self.after_pointer(outcome)
    }

    fn after_pointer(&mut self, outcome: PointerOutcome) -> PointerOutcome {
        if outcome.needs_redraw() {
            self.redraw();
        }
        outcome
    }

    // --- tools and annotations ---

    pub fn tool(&self) -> DrawingTool {
        self.drawings.tool()
    }

    /// Whether pointer events should go to the overlay rather than the chart.
    pub fn overlay_captures_pointer(&self) -> bool {
        self.drawings.tool().captures_pointer()
    }

    pub fn set_tool(&mut self, tool: DrawingTool) {
        if self.drawings.set_tool(tool) {
            self.redraw();
        }
    }

    pub fn drawings(&self) -> &DrawingCollection {
        self.drawings.drawings()
    }

    pub fn toggle_drawings_visibility(&mut self) -> bool {
        let visible = self.drawings.drawings_mut().toggle_visibility();
        self.redraw();
        visible
    }

    pub fn remove_drawing(&mut self, id: &str) -> bool {
        let removed = self.drawings.drawings_mut().remove(id).is_some();
        if removed {
            self.redraw();
        }
        removed
    }

    pub fn clear_drawings(&mut self) -> usize {
        let count = self.drawings.drawings_mut().clear();
        tracing::debug!(count, "Cleared drawings");
        self.redraw();
        count
    }

    // --- viewport ---

    /// Applies a pan/zoom/resize to the chart, then re-derives every annotation's pixels.
    pub fn update_viewport<R>(&mut self, change: impl FnOnce(&mut W) -> R) -> R {
        let result = change(&mut self.chart);
        self.redraw();
        result
    }

    // --- indicators ---

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn toggle_indicator(&mut self, id: &str) -> Result<bool, EngineError> {
        let enabled = self.catalog.toggle(id)?;
        self.recompute_indicators();
        Ok(enabled)
    }

    pub fn update_indicator_settings(&mut self, id: &str, patch: IndicatorSettings) -> Result<(), EngineError> {
        self.catalog.update_settings(id, patch)?;
        self.recompute_indicators();
        Ok(())
    }

    pub fn toggle_indicator_visibility(&mut self, id: &str) -> Option<bool> {
        self.overlay.toggle_visibility(id, &mut self.chart)
    }

    pub fn is_indicator_visible(&self, id: &str) -> bool {
        self.overlay.is_visible(id)
    }

    fn recompute_indicators(&mut self) {
        self.overlay.recompute(&self.catalog, &self.candles, &mut self.chart);
    }

    pub fn computed_indicators(&self) -> &[ComputedIndicator] {
        self.overlay.computed()
    }

    pub fn sub_indicators(&self) -> Vec<ComputedIndicator> {
        compute_sub_indicators(&self.catalog, &self.candles)
    }

    /// Legend values at a hovered time, or at the latest bar when nothing is hovered.
    pub fn legend_values(&self, hovered: Option<i64>) -> BTreeMap<String, Option<f64>> {
        self.overlay.legend_values(hovered)
    }

    pub fn legend(&self, hovered: Option<i64>) -> Vec<LegendEntry> {
        self.overlay.legend(hovered)
    }

    /// Legend for a pointer hovering at pixel `x`.
    pub fn legend_at_pixel(&self, x: f64) -> Vec<LegendEntry> {
        let hovered = self.chart.x_to_time(x).map(|t| t.floor() as i64);
        self.overlay.legend(hovered)
    }

    // --- rendering ---

    pub fn redraw(&mut self) -> RenderReport {
        let preview = self.drawings.preview();
        let collection = self.drawings.drawings();
        self.renderer.render(
            &mut self.surface,
            &self.mapper,
            &self.chart,
            collection.as_slice(),
            preview.as_ref(),
            collection.is_visible(),
        )
    }

    /// Handle for callbacks that want a redraw without painting inline.
    pub fn redraw_handle(&self) -> RedrawHandle {
        self.renderer.handle()
    }

    /// Serves a redraw requested through the handle, if any.
    pub fn flush(&mut self) -> Option<RenderReport> {
        self.renderer.needs_redraw().then(|| self.redraw())
    }

    // --- accessors ---

    pub fn chart(&self) -> &W {
        &self.chart
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn request(&self) -> Option<&FetchRequest> {
        self.request.as_ref()
    }

    pub fn stats(&self) -> Option<MarketStats> {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{HeadlessChart, LinearViewport};
    use crate::render::RecordingSurface;
    use shared::models::Interval;

    type TestSession = ChartSession<HeadlessChart, RecordingSurface>;

    fn candles(n: usize, base: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = base + i as f64;
                Candle { time: 3_600 * (i as i64 + 1), open: close, high: close + 2.0, low: close - 2.0, close, volume: 1.0 }
            })
            .collect()
    }

    fn session() -> TestSession {
        let chart = HeadlessChart::new(LinearViewport::new(800.0, 400.0));
        ChartSession::new(chart, RecordingSurface::new(800.0, 400.0), &EngineSettings::default())
    }

    fn request(symbol: &str) -> FetchRequest {
        FetchRequest::new(symbol, Interval::Hour1, 100)
    }

    fn draw_horizontal(s: &mut TestSession) -> PointerOutcome {
        s.set_tool(DrawingTool::Horizontal);
        s.pointer_down(400.0, 200.0);
        s.pointer_up()
    }

    #[test]
    fn test_pointer_events_are_no_ops_while_fetching() {
        let mut s = session();
        let ticket = s.begin_fetch(&request("BTCUSDT"));
        assert!(!s.overlay_captures_pointer());
        assert_eq!(draw_horizontal(&mut s), PointerOutcome::Ignored);
        assert!(s.overlay_captures_pointer());
        assert!(s.is_fetching());

        s.complete_fetch(ticket, request("BTCUSDT"), Ok(candles(50, 100.0))).unwrap();
        assert!(matches!(draw_horizontal(&mut s), PointerOutcome::Committed(_)));
        assert_eq!(s.drawings().len(), 1);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut s = session();
        let first = s.begin_fetch(&request("BTCUSDT"));
        let second = s.begin_fetch(&request("ETHUSDT"));
        s.complete_fetch(second, request("ETHUSDT"), Ok(candles(20, 3_000.0))).unwrap();

        let stale = s.complete_fetch(first, request("BTCUSDT"), Ok(candles(50, 100.0)));
        assert!(matches!(stale, Err(EngineError::StaleFetchDiscarded { .. })));
        assert_eq!(s.candles().len(), 20);
        assert_eq!(s.request().unwrap().symbol, "ETHUSDT");
    }

    #[test]
    fn test_failed_fetch_keeps_previous_state() {
        let mut s = session();
        let ticket = s.begin_fetch(&request("BTCUSDT"));
        s.complete_fetch(ticket, request("BTCUSDT"), Ok(candles(50, 100.0))).unwrap();
        let bounds = s.mapper().bounds();

        let ticket = s.begin_fetch(&request("ETHUSDT"));
        let err = s
            .complete_fetch(ticket, request("ETHUSDT"), Err(EngineError::FetchFailure("timeout".to_string())))
            .unwrap_err();
        assert!(err.is_fetch_failure());
        assert_eq!(s.mapper().bounds(), bounds);
        assert_eq!(s.candles().len(), 50);
        assert!(matches!(draw_horizontal(&mut s), PointerOutcome::Committed(_)));
    }

    #[test]
    fn test_indicator_toggle_recomputes_series() {
        let mut s = session();
        let ticket = s.begin_fetch(&request("BTCUSDT"));
        s.complete_fetch(ticket, request("BTCUSDT"), Ok(candles(50, 100.0))).unwrap();

        assert!(s.toggle_indicator("ema").unwrap());
        assert!(s.chart().series.get("ema").is_some());
        s.update_indicator_settings("ema", IndicatorSettings { period: Some(5), ..Default::default() })
            .unwrap();
        assert_eq!(s.chart().series.get("ema").unwrap().points.len(), 46);
        assert_eq!(s.legend(None)[0].label, "EMA(5)");
        assert!(s.toggle_indicator("nope").is_err());

        assert_eq!(s.sub_indicators().len(), 1);
    }

    #[test]
    fn test_visibility_toggle_and_clear_repaint() {
        let mut s = session();
        let ticket = s.begin_fetch(&request("BTCUSDT"));
        s.complete_fetch(ticket, request("BTCUSDT"), Ok(candles(50, 100.0))).unwrap();
        draw_horizontal(&mut s);
        assert_eq!(s.surface().commands().len(), 1);

        assert!(!s.toggle_drawings_visibility());
        assert!(s.surface().commands().is_empty());
        assert!(s.toggle_drawings_visibility());
        assert_eq!(s.clear_drawings(), 1);
        assert!(s.surface().commands().is_empty());
        assert!(s.drawings().is_empty());
    }

    #[test]
    fn test_flush_serves_handle_requests() {
        let mut s = session();
        assert!(s.flush().is_none());
        let frames = s.surface().frames();
        s.redraw_handle().request();
        assert_eq!(s.flush().map(|r| r.passes), Some(1));
        assert_eq!(s.surface().frames(), frames + 1);
    }
}
