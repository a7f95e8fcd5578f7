// Engine library root: indicator math, coordinate mapping, the annotation
// state machine and overlay renderer, and the session that wires them to a
// chart widget and a market data provider.

pub mod chart;
pub mod config;
pub mod coords;
pub mod data;
pub mod drawing;
pub mod error;
pub mod indicators;
pub mod overlay;
pub mod render;
pub mod session;

pub use error::{EngineError, Result};
pub use session::ChartSession;
