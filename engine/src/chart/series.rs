// In-memory series storage standing in for the widget's line series.
use super::SeriesSink;
use serde::Serialize;
use shared::models::Candle;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub color: String,
    pub line_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub points: Vec<(i64, f64)>,
    pub style: SeriesStyle,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesStore {
    candles: Vec<Candle>,
    series: BTreeMap<String, LineSeries>,
}

impl SeriesStore {
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get(&self, series_id: &str) -> Option<&LineSeries> {
        self.series.get(series_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl SeriesSink for SeriesStore {
    fn set_candles(&mut self, candles: &[Candle]) {
        self.candles = candles.to_vec();
    }

    fn set_line_series(&mut self, series_id: &str, points: Vec<(i64, f64)>, style: SeriesStyle) {
        self.series
            .insert(series_id.to_string(), LineSeries { points, style, visible: true });
    }

    fn remove_series(&mut self, series_id: &str) {
        self.series.remove(series_id);
    }

    fn set_series_visible(&mut self, series_id: &str, visible: bool) {
        if let Some(series) = self.series.get_mut(series_id) {
            series.visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> SeriesStyle {
        SeriesStyle { color: "#fff".to_string(), line_width: 1 }
    }

    #[test]
    fn test_replace_hide_and_remove() {
        let mut store = SeriesStore::default();
        store.set_line_series("sma", vec![(1, 1.0)], style());
        store.set_series_visible("sma", false);
        // Replacing a series makes it visible again; visibility is the caller's to restore.
        store.set_line_series("sma", vec![(1, 2.0), (2, 3.0)], style());
        assert!(store.get("sma").unwrap().visible);
        assert_eq!(store.get("sma").unwrap().points.len(), 2);

        store.set_series_visible("missing", false);
        store.remove_series("sma");
        assert!(store.is_empty());
    }
}
