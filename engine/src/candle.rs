use std::fmt;

/// One fixed-interval OHLCV bar, most-recent-last in every fetched series.
///
/// Closed bars are immutable; the final element of a fetch may still be
/// forming and is dropped by [`closed_bars`] before evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    /// Bar open time, unix milliseconds.
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Base-asset volume traded during the bar.
    pub volume: f64,
    /// Bar close time, unix milliseconds.
    pub close_time: u64,
    /// Quote-asset volume traded during the bar.
    pub quote_volume: f64,
}

/// The chart timeframes the scanner evaluates, shortest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    M15,
    H1,
    H4,
    D1,
}

impl Interval {
    pub const ALL: [Interval; 4] = [Interval::M15, Interval::H1, Interval::H4, Interval::D1];

    /// Exchange query token for this interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M15 => "15m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops the still-forming final bar of a fetched series.
///
/// Evaluating on the forming bar makes a setup flicker as the bar updates;
/// working on closed bars only costs one bar of latency and keeps any
/// reading reproducible until the next bar closes.
pub fn closed_bars(bars: &[Candle]) -> &[Candle] {
    bars.split_last().map_or(&[], |(_, closed)| closed)
}

pub fn closes(bars: &[Candle]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn highs(bars: &[Candle]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub fn lows(bars: &[Candle]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}

pub fn volumes(bars: &[Candle]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open_time: u64, close: f64) -> Candle {
        Candle {
            open_time,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
            close_time: open_time + 1,
            quote_volume: close,
        }
    }

    #[test]
    fn test_closed_bars_drops_the_forming_bar() {
        let bars = [bar(0, 1.0), bar(1, 2.0), bar(2, 3.0)];
        let closed = closed_bars(&bars);
        assert_eq!(closed.len(), 2);
        assert_eq!(closed.last().map(|b| b.close), Some(2.0));
    }

    #[test]
    fn test_closed_bars_on_empty_stays_empty() {
        assert!(closed_bars(&[]).is_empty());
    }

    #[test]
    fn test_closed_bars_on_a_lone_forming_bar_is_empty() {
        assert!(closed_bars(&[bar(0, 1.0)]).is_empty());
    }

    #[test]
    fn test_interval_tokens() {
        let tokens: Vec<&str> = Interval::ALL.iter().map(|i| i.as_str()).collect();
        assert_eq!(tokens, ["15m", "1h", "4h", "1d"]);
    }

    #[test]
    fn test_column_views_align_with_bars() {
        let mut bars = vec![bar(0, 1.5), bar(1, 2.5)];
        bars[0].high = 2.0;
        bars[0].low = 1.0;
        assert_eq!(closes(&bars), [1.5, 2.5]);
        assert_eq!(highs(&bars), [2.0, 2.5]);
        assert_eq!(lows(&bars), [1.0, 2.5]);
        assert_eq!(volumes(&bars), [1.0, 1.0]);
    }
}
