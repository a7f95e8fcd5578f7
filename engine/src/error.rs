use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // The chart scale could not resolve a pixel <-> domain conversion
    // (no candles loaded, degenerate viewport, fetch in flight).
    #[error("No coordinate: {0}")]
    NoCoordinate(&'static str),

    #[error("Indicator error: {0}")]
    IndicatorError(String),

    #[error("Market data fetch failed: {0}")]
    FetchFailure(String),

    #[error("Stale fetch result discarded (ticket {ticket}, latest {latest})")]
    StaleFetchDiscarded { ticket: u64, latest: u64 },

    #[error("HTTP error: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),
}

impl EngineError {
    /// Errors the caller should swallow without surfacing anything to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, EngineError::NoCoordinate(_) | EngineError::StaleFetchDiscarded { .. })
    }

    /// Errors that belong to the market data path and leave the previous chart state in place.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            EngineError::FetchFailure(_)
                | EngineError::HttpError { .. }
                | EngineError::JsonError { .. }
                | EngineError::CsvSystemError { .. }
                | EngineError::IoError { .. }
                | EngineError::CsvDataFormatError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
