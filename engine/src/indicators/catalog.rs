// Fixed indicator catalog for a chart session.
use crate::error::EngineError;
use shared::models::{Indicator, IndicatorCategory, IndicatorSettings, IndicatorType};

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    kind: IndicatorType,
    enabled: bool,
    category: IndicatorCategory,
    period: Option<usize>,
    std_dev: Option<f64>,
    color: &str,
    line_width: u32,
) -> Indicator {
    Indicator {
        id: id.to_string(),
        kind,
        enabled,
        category,
        settings: IndicatorSettings {
            period,
            color: Some(color.to_string()),
            line_width: Some(line_width),
            std_dev,
        },
    }
}

pub fn default_indicators() -> Vec<Indicator> {
    use IndicatorCategory::{Main, Sub};
    use IndicatorType::*;

    vec![
        entry("ma", MA, false, Main, Some(20), None, "#2196F3", 2),
        entry("ema", EMA, false, Main, Some(20), None, "#FF9800", 2),
        entry("sma", SMA, false, Main, Some(20), None, "#4CAF50", 2),
        entry("boll", BOLL, false, Main, Some(20), Some(2.0), "#9C27B0", 1),
        entry("sar", SAR, false, Main, None, None, "#F44336", 2),
        entry("bbi", BBI, false, Main, None, None, "#00BCD4", 2),
        entry("vol", VOL, true, Sub, Some(5), None, "#607D8B", 1),
        entry("vol-ma", MA, false, Sub, Some(5), None, "#FFC107", 1),
    ]
}

/// Owns the indicator entries; only `enabled` and `settings` ever change.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    pub fn all(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn get(&self, id: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|ind| ind.id == id)
    }

    /// Flips `enabled` and returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, EngineError> {
        let indicator = self.get_mut(id)?;
        indicator.enabled = !indicator.enabled;
        tracing::debug!(indicator = %id, enabled = indicator.enabled, "Toggled indicator");
        Ok(indicator.enabled)
    }

    /// Merges a partial settings update into the entry.
    pub fn update_settings(&mut self, id: &str, patch: IndicatorSettings) -> Result<(), EngineError> {
        if patch.period == Some(0) {
            return Err(EngineError::IndicatorError(format!("Indicator '{}' period cannot be 0", id)));
        }
        if let Some(std_dev) = patch.std_dev {
            if !(std_dev > 0.0) {
                return Err(EngineError::IndicatorError(format!(
                    "Indicator '{}' stdDev must be positive, got {}",
                    id, std_dev
                )));
            }
        }
        let indicator = self.get_mut(id)?;
        indicator.settings.merge(patch);
        tracing::debug!(indicator = %id, settings = ?indicator.settings, "Updated indicator settings");
        Ok(())
    }

    /// Enabled entries, optionally restricted to one category, in catalog order.
    pub fn active(&self, category: Option<IndicatorCategory>) -> Vec<&Indicator> {
        self.indicators
            .iter()
            .filter(|ind| ind.enabled && category.map_or(true, |c| ind.category == c))
            .collect()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Indicator, EngineError> {
        self.indicators
            .iter_mut()
            .find(|ind| ind.id == id)
            .ok_or_else(|| EngineError::IndicatorError(format!("Unknown indicator id: {}", id)))
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::new(default_indicators())
    }
}
