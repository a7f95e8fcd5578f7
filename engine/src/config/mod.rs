// Engine configuration
pub mod settings;

pub use settings::{ChartSettings, DrawingSettings, EngineSettings, MarketDataSettings};
