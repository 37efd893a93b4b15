use crate::candle::{self, Candle};
use crate::series::{self, EPSILON};

/// Indicator periods and history floor used on every timeframe.
///
/// All fields are plain data so deployments can override any of them; the
/// defaults are the values the scan family has always run with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorParams {
    /// Fast exponential average span (default 9).
    pub ema_fast: usize,
    /// Slow simple average window (default 20).
    pub sma_slow: usize,
    /// Mid trend average window (default 50).
    pub ma_mid: usize,
    /// Long trend average window (default 200).
    pub ma_long: usize,
    /// RSI period (default 14).
    pub rsi_period: usize,
    /// Bollinger window (default 20).
    pub bb_window: usize,
    /// Bollinger standard-deviation multiplier (default 2.0).
    pub bb_mult: f64,
    /// MACD fast EMA span (default 12).
    pub macd_fast: usize,
    /// MACD slow EMA span (default 26).
    pub macd_slow: usize,
    /// MACD signal EMA span (default 9).
    pub macd_signal: usize,
    /// Volume moving-average window for the volume ratio (default 20).
    pub volume_window: usize,
    /// Minimum closed bars per timeframe before anything is evaluated
    /// (default 50). Thin or newly listed markets sit below this floor for
    /// a while; that is a normal condition, not an error.
    pub min_bars: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 9,
            sma_slow: 20,
            ma_mid: 50,
            ma_long: 200,
            rsi_period: 14,
            bb_window: 20,
            bb_mult: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volume_window: 20,
            min_bars: 50,
        }
    }
}

/// Latest-bar indicator readings for one timeframe.
///
/// Everything the setup predicates look at, read once at the last closed
/// bar so evaluation never re-walks the series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeframeSnapshot {
    pub close: f64,
    pub prev_close: f64,
    pub prev_high: f64,
    pub volume: f64,
    pub prev_volume: f64,
    pub ema_fast: f64,
    pub sma_slow: f64,
    pub ma_mid: f64,
    pub ma_long: f64,
    pub rsi: f64,
    /// Relative Bollinger width at the latest bar.
    pub bb_width: f64,
    /// Relative Bollinger width one bar earlier, for expansion checks.
    pub bb_width_prev: f64,
    /// Latest volume over the trailing volume-window mean (which includes
    /// the latest bar).
    pub volume_ratio: f64,
    pub macd_hist: f64,
}

impl TimeframeSnapshot {
    /// Computes the snapshot for a series of closed bars.
    ///
    /// `None` when the series is shorter than `params.min_bars` or too
    /// short for the configured Bollinger window; both mean "not enough
    /// history yet" and the caller skips evaluation for this timeframe.
    pub fn compute(bars: &[Candle], params: &IndicatorParams) -> Option<TimeframeSnapshot> {
        // Two bars minimum regardless of config: the prev_* readings and
        // the width comparison reach one bar back.
        if bars.len() < params.min_bars.max(2) {
            return None;
        }
        let closes = candle::closes(bars);
        let highs = candle::highs(bars);
        let volumes = candle::volumes(bars);
        let last = bars.len() - 1;

        let bands = series::bollinger(&closes, params.bb_window, params.bb_mult);
        let bb_width = bands.width_back(0)?;
        let bb_width_prev = bands.width_back(1)?;

        let window = params.volume_window.min(volumes.len()).max(1);
        let vol_mean = volumes[volumes.len() - window..].iter().sum::<f64>() / window as f64;

        Some(TimeframeSnapshot {
            close: closes[last],
            prev_close: closes[last - 1],
            prev_high: highs[last - 1],
            volume: volumes[last],
            prev_volume: volumes[last - 1],
            ema_fast: last_of(&series::ema(&closes, params.ema_fast)),
            sma_slow: last_of(&series::sma(&closes, params.sma_slow)),
            ma_mid: last_of(&series::sma(&closes, params.ma_mid)),
            ma_long: last_of(&series::sma(&closes, params.ma_long)),
            rsi: last_of(&series::rsi(&closes, params.rsi_period)),
            bb_width,
            bb_width_prev,
            volume_ratio: volumes[last] / (vol_mean + EPSILON),
            macd_hist: series::macd_histogram(
                &closes,
                params.macd_fast,
                params.macd_slow,
                params.macd_signal,
            ),
        })
    }
}

fn last_of(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(0.0)
}

/// The four timeframes one symbol is evaluated on.
///
/// A missing timeframe (fetch failure or short history) disables the setups
/// that require it and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymbolSnapshot {
    pub m15: Option<TimeframeSnapshot>,
    pub h1: Option<TimeframeSnapshot>,
    pub h4: Option<TimeframeSnapshot>,
    pub d1: Option<TimeframeSnapshot>,
}
