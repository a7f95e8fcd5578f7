// Small helpers shared across the engine and UI layers.

/// Converts a display symbol (`BTC/USDT`, `btc-usdt`) into exchange form (`BTCUSDT`).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Legend formatting: two decimals, or `--` when there is no value.
pub fn format_indicator_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "--".to_string(),
    }
}
