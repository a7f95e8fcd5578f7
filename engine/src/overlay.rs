// Indicator overlay controller: pushes computed indicator lines into the chart's
// series and answers legend lookups at the hovered time.
use crate::chart::{SeriesSink, SeriesStyle};
use crate::indicators::{build_calculator, IndicatorCatalog, IndicatorLine};
use serde::Serialize;
use shared::models::{Candle, Indicator, IndicatorCategory, IndicatorType};
use shared::utils::format_indicator_value;
use std::collections::{BTreeMap, HashMap};

const DEFAULT_SERIES_COLOR: &str = "#2196F3";
const DEFAULT_SERIES_WIDTH: u32 = 1;

/// Output of one indicator over the loaded candles, aligned bar for bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedIndicator {
    pub id: String,
    pub kind: IndicatorType,
    pub label: String,
    pub style: SeriesStyle,
    pub times: Vec<i64>,
    pub lines: Vec<IndicatorLine>,
}

impl ComputedIndicator {
    /// Chart series ids: the indicator id for single-line indicators, `id:key` per band otherwise.
    pub fn series_ids(&self) -> Vec<String> {
        if self.lines.len() == 1 {
            vec![self.id.clone()]
        } else {
            self.lines.iter().map(|line| format!("{}:{}", self.id, line.key)).collect()
        }
    }

    /// The line the legend reports: the middle band for Bollinger Bands, else the first line.
    pub fn legend_line(&self) -> Option<&IndicatorLine> {
        match self.kind {
            IndicatorType::BOLL => self.lines.iter().find(|line| line.key == "middle"),
            _ => self.lines.first(),
        }
    }

    /// Legend value at `hovered` (last bar at or before it), or at the latest bar.
    pub fn value_at(&self, hovered: Option<i64>) -> Option<f64> {
        let index = match hovered {
            Some(time) => self.times.partition_point(|&t| t <= time).checked_sub(1)?,
            None => self.times.len().checked_sub(1)?,
        };
        self.legend_line()?.values.get(index).copied().flatten()
    }

    fn points(&self, line: &IndicatorLine) -> Vec<(i64, f64)> {
        self.times
            .iter()
            .zip(&line.values)
            .filter_map(|(&time, value)| value.map(|v| (time, v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub id: String,
    pub label: String,
    pub color: String,
    pub value: Option<f64>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct IndicatorOverlayController {
    computed: Vec<ComputedIndicator>,
    visibility: HashMap<String, bool>,
}

impl IndicatorOverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every indicator series on the chart with freshly computed ones for
    /// the enabled main-pane indicators. Returns how many indicators were pushed.
    pub fn recompute(&mut self, catalog: &IndicatorCatalog, candles: &[Candle], sink: &mut dyn SeriesSink) -> usize {
        self.clear(sink);

        let computed = compute_all(catalog, IndicatorCategory::Main, candles);

        // Entries that survive keep their visibility; new ones start visible.
        let previous = std::mem::take(&mut self.visibility);
        for indicator in &computed {
            let visible = previous.get(&indicator.id).copied().unwrap_or(true);
            self.visibility.insert(indicator.id.clone(), visible);

            for (series_id, line) in indicator.series_ids().iter().zip(&indicator.lines) {
                sink.set_line_series(series_id, indicator.points(line), indicator.style.clone());
                if !visible {
                    sink.set_series_visible(series_id, false);
                }
            }
        }

        tracing::debug!(
            indicators = computed.len(),
            candles = candles.len(),
            "Recomputed main indicator series"
        );
        self.computed = computed;
        self.computed.len()
    }

    /// Removes every series this controller put on the chart.
    pub fn clear(&mut self, sink: &mut dyn SeriesSink) {
        for indicator in &self.computed {
            for series_id in indicator.series_ids() {
                sink.remove_series(&series_id);
            }
        }
        self.computed.clear();
    }

    /// Shows or hides an indicator without recomputing it; every band of a
    /// multi-line indicator follows. Returns the new visibility, or `None` if
    /// the indicator is not currently on the chart.
    pub fn toggle_visibility(&mut self, id: &str, sink: &mut dyn SeriesSink) -> Option<bool> {
        let indicator = self.computed.iter().find(|ind| ind.id == id)?;
        let visible = !self.is_visible(id);
        for series_id in indicator.series_ids() {
            sink.set_series_visible(&series_id, visible);
        }
        self.visibility.insert(id.to_string(), visible);
        tracing::debug!(indicator = %id, visible, "Toggled indicator visibility");
        Some(visible)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visibility.get(id).copied().unwrap_or(false)
    }

    pub fn computed(&self) -> &[ComputedIndicator] {
        &self.computed
    }

    /// `{indicator id -> value}` for every visible indicator.
    pub fn legend_values(&self, hovered: Option<i64>) -> BTreeMap<String, Option<f64>> {
        self.computed
            .iter()
            .filter(|ind| self.is_visible(&ind.id))
            .map(|ind| (ind.id.clone(), ind.value_at(hovered)))
            .collect()
    }

    /// Legend rows with labels and formatted values, in catalog order.
    pub fn legend(&self, hovered: Option<i64>) -> Vec<LegendEntry> {
        self.computed
            .iter()
            .filter(|ind| self.is_visible(&ind.id))
            .map(|ind| {
                let value = ind.value_at(hovered);
                LegendEntry {
                    id: ind.id.clone(),
                    label: ind.label.clone(),
                    color: ind.style.color.clone(),
                    value,
                    text: format_indicator_value(value),
                }
            })
            .collect()
    }
}

/// Computes the enabled sub-pane indicators (volume and its average). They are
/// not pushed to the price pane.
pub fn compute_sub_indicators(catalog: &IndicatorCatalog, candles: &[Candle]) -> Vec<ComputedIndicator> {
    compute_all(catalog, IndicatorCategory::Sub, candles)
}

fn compute_all(catalog: &IndicatorCatalog, category: IndicatorCategory, candles: &[Candle]) -> Vec<ComputedIndicator> {
    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();
    catalog
        .active(Some(category))
        .into_iter()
        .filter_map(|indicator| match compute_one(indicator, candles, &times) {
            Ok(computed) => Some(computed),
            Err(e) => {
                tracing::warn!(indicator = %indicator.id, error = %e, "Skipping indicator");
                None
            }
        })
        .collect()
}

fn compute_one(
    indicator: &Indicator,
    candles: &[Candle],
    times: &[i64],
) -> Result<ComputedIndicator, crate::error::EngineError> {
    let calculator = build_calculator(indicator)?;
    tracing::trace!(
        indicator = %indicator.id,
        calculator = calculator.name(),
        parameters = %calculator.parameters(),
        "Computing indicator"
    );
    Ok(ComputedIndicator {
        id: indicator.id.clone(),
        kind: indicator.kind,
        label: indicator.label(),
        style: SeriesStyle {
            color: indicator
                .settings
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_SERIES_COLOR.to_string()),
            line_width: indicator.settings.line_width.unwrap_or(DEFAULT_SERIES_WIDTH),
        },
        times: times.to_vec(),
        lines: calculator.calculate(candles),
    })
}
