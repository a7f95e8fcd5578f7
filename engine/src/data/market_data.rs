// Market data provider contract, fetch sequencing and candle normalisation.
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use shared::models::{Candle, Interval, MarketStats};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
}

impl FetchRequest {
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: usize) -> Self {
        Self { symbol: symbol.into(), interval, limit }
    }
}

/// External source of candles and 24h statistics. Failures are reported, never
/// papered over with synthetic data.
#[allow(async_fn_in_trait)]
pub trait MarketDataProvider {
    async fn fetch_candles(&self, request: &FetchRequest) -> Result<Vec<Candle>, EngineError>;
    async fn fetch_stats(&self, symbol: &str) -> Result<MarketStats, EngineError>;
}

/// Sorts by time and keeps one bar per timestamp (the last one seen).
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.time);
    // dedup_by keeps the first of a run; copy the later bar over it first.
    candles.dedup_by(|later, earlier| {
        if later.time == earlier.time {
            *earlier = *later;
            true
        } else {
            false
        }
    });
    candles
}

/// Statistics over a loaded series: last close, change against the first open,
/// extreme high/low and total volume.
pub fn stats_from_candles(candles: &[Candle]) -> Option<MarketStats> {
    let first = candles.first()?;
    let last = candles.last()?;
    let change = last.close - first.open;
    Some(MarketStats {
        current_price: last.close,
        price_change: change,
        price_change_percent: if first.open != 0.0 { change / first.open * 100.0 } else { 0.0 },
        high_24h: candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
        low_24h: candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
        volume_24h: candles.iter().map(|c| c.volume).sum(),
    })
}

/// Identifies one fetch. Only the most recently issued ticket may install data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: u64,
    in_flight: bool,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn begin(&mut self) -> FetchTicket {
        self.latest += 1;
        self.in_flight = true;
        FetchTicket(self.latest)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Settles a ticket. Stale tickets are rejected and leave the in-flight state alone.
    pub fn settle(&mut self, ticket: FetchTicket) -> Result<(), EngineError> {
        if !self.is_current(ticket) {
            return Err(EngineError::StaleFetchDiscarded { ticket: ticket.0, latest: self.latest });
        }
        self.in_flight = false;
        Ok(())
    }
}
