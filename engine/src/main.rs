// Headless chart engine: loads candles, computes the enabled indicators, prints
// the legend, optionally replays a drawing gesture, and dumps the overlay as JSON.
use anyhow::Context;
use clap::Parser;
use engine::chart::{HeadlessChart, LinearViewport};
use engine::config::settings::EngineSettings;
use engine::data::{FetchRequest, MarketDataSource};
use engine::drawing::DrawingTool;
use engine::render::RecordingSurface;
use engine::ChartSession;
use shared::models::Interval;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chart-engine")]
#[command(about = "Compute chart indicators and annotation overlays without a UI")]
struct Args {
    /// JSON settings file; the embedded defaults are used when absent
    #[arg(long, env = "CHART_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    symbol: Option<String>,

    /// Candle interval (1m, 5m, 15m, 1h, 4h, 1d)
    #[arg(short, long)]
    interval: Option<Interval>,

    /// Number of candles to load (at least 1)
    #[arg(short, long, value_parser = parse_limit)]
    limit: Option<usize>,

    /// Read `{SYMBOL}_{interval}.csv` files from this directory instead of Binance
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Indicator id to enable (repeatable), e.g. `--indicator sma --indicator boll`
    #[arg(long = "indicator")]
    indicators: Vec<String>,

    /// Replay a drag across the middle of the chart with this tool
    #[arg(long)]
    tool: Option<DrawingTool>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => EngineSettings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => EngineSettings::load_default().context("embedded settings are invalid")?,
    };
    if let Some(symbol) = &args.symbol {
        settings.market_data.symbol = symbol.clone();
    }
    if let Some(interval) = args.interval {
        settings.market_data.interval = interval;
    }
    if let Some(limit) = args.limit {
        settings.market_data.limit = limit;
    }
    if let Some(dir) = &args.csv_dir {
        settings.market_data.csv_dir = Some(dir.clone());
    }
    settings.validate().context("invalid settings after command-line overrides")?;

    info!(symbol = %settings.market_data.symbol, interval = %settings.market_data.interval, "Starting chart engine");

    let source = MarketDataSource::from_settings(&settings.market_data)?;
    let chart = HeadlessChart::new(LinearViewport::new(settings.chart.width, settings.chart.height))
        .with_price_margin(settings.chart.price_margin);
    let surface = RecordingSurface::new(settings.chart.width, settings.chart.height);
    let mut session = ChartSession::new(chart, surface, &settings);

    for id in &args.indicators {
        let enabled = session.catalog().get(id).map(|ind| ind.enabled);
        match enabled {
            Some(false) => {
                session.toggle_indicator(id)?;
            }
            Some(true) => {}
            None => warn!(indicator = %id, "Unknown indicator id; ignoring"),
        }
    }

    let request = FetchRequest::new(
        settings.market_data.symbol.clone(),
        settings.market_data.interval,
        settings.market_data.limit,
    );
    let count = session.load(&source, request).await?;
    if count == 0 {
        warn!("No candles returned; nothing to draw");
    }

    if let Err(e) = session.refresh_stats(&source, &settings.market_data.symbol).await {
        warn!(error = %e, "Could not fetch market stats");
    }

    for entry in session.legend(None) {
        info!(indicator = %entry.id, "{}: {}", entry.label, entry.text);
    }

    if let Some(tool) = args.tool {
        let (w, h) = (settings.chart.width, settings.chart.height);
        session.set_tool(tool);
        session.pointer_down(w * 0.25, h * 0.25);
        session.pointer_move(w * 0.75, h * 0.75);
        let outcome = session.pointer_up();
        info!(tool = %tool, ?outcome, "Replayed gesture");
    }

    let report = serde_json::json!({
        "symbol": settings.market_data.symbol,
        "interval": settings.market_data.interval,
        "candles": session.candles().len(),
        "stats": session.stats(),
        "legend": session.legend(None),
        "drawings": session.drawings().as_slice(),
        "overlay": session.surface().commands(),
    });
    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote report");
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_must_be_positive() {
        assert!(Args::try_parse_from(["chart-engine", "--limit", "0"]).is_err());
        let args = Args::try_parse_from(["chart-engine", "--limit", "250", "--indicator", "sma", "--indicator", "boll"])
            .unwrap();
        assert_eq!(args.limit, Some(250));
        assert_eq!(args.indicators, vec!["sma", "boll"]);
    }

    #[test]
    fn test_interval_and_tool_parse_by_id() {
        let args = Args::try_parse_from(["chart-engine", "-i", "4h", "--tool", "fibonacci"]).unwrap();
        assert_eq!(args.interval, Some(Interval::Hour4));
        assert_eq!(args.tool, Some(DrawingTool::Fibonacci));
        assert!(Args::try_parse_from(["chart-engine", "--interval", "2h"]).is_err());
    }
}
