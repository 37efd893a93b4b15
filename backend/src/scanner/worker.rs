use tracing::{instrument, warn};

use engine::candle::{Candle, Interval, closed_bars};
use engine::setup::{Signal, evaluate};
use engine::snapshot::{SymbolSnapshot, TimeframeSnapshot};

use crate::config::AppConfig;
use crate::market::CandleSource;

/// What one symbol pass produced, for the cycle tally.
#[derive(Debug)]
pub enum ScanOutcome {
    /// At least one setup confirmed. Dispatch and cooldowns happen at the
    /// fan-in, not here.
    Fired(Vec<Signal>),
    Quiet,
    /// Bars arrived but no timeframe had enough closed history yet.
    ShortHistory,
    /// Every fetch came back empty or failed.
    NoData,
}

/// Scans one symbol across all four timeframes.
///
/// Fetch failures degrade to an empty series so one flaky symbol never
/// poisons the rest of the cycle; the evaluator then skips whatever it
/// cannot see.
#[instrument(skip(client, cfg), level = "debug")]
pub async fn scan_symbol<C: CandleSource>(
    client: &C,
    symbol: &str,
    cfg: &AppConfig,
) -> ScanOutcome {
    let limit = cfg.kline_limit;
    let (m15, h1, h4, d1) = tokio::join!(
        fetch_or_empty(client, symbol, Interval::M15, limit),
        fetch_or_empty(client, symbol, Interval::H1, limit),
        fetch_or_empty(client, symbol, Interval::H4, limit),
        fetch_or_empty(client, symbol, Interval::D1, limit),
    );

    if m15.is_empty() && h1.is_empty() && h4.is_empty() && d1.is_empty() {
        return ScanOutcome::NoData;
    }

    // Indicators only ever see closed bars; the forming one is dropped.
    let snapshot = SymbolSnapshot {
        m15: TimeframeSnapshot::compute(closed_bars(&m15), &cfg.indicators),
        h1: TimeframeSnapshot::compute(closed_bars(&h1), &cfg.indicators),
        h4: TimeframeSnapshot::compute(closed_bars(&h4), &cfg.indicators),
        d1: TimeframeSnapshot::compute(closed_bars(&d1), &cfg.indicators),
    };

    if snapshot.m15.is_none()
        && snapshot.h1.is_none()
        && snapshot.h4.is_none()
        && snapshot.d1.is_none()
    {
        return ScanOutcome::ShortHistory;
    }

    let signals = evaluate(&snapshot, &cfg.setups);
    if signals.is_empty() {
        ScanOutcome::Quiet
    } else {
        ScanOutcome::Fired(signals)
    }
}

async fn fetch_or_empty<C: CandleSource>(
    client: &C,
    symbol: &str,
    interval: Interval,
    limit: u32,
) -> Vec<Candle> {
    match client.fetch_klines(symbol, interval, limit).await {
        Ok(bars) => bars,
        Err(e) => {
            warn!(symbol = %symbol, interval = %interval, error = %e, "kline fetch failed");
            Vec::new()
        }
    }
}
