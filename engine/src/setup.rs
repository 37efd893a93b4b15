use std::fmt;

use tracing::debug;

use crate::snapshot::{SymbolSnapshot, TimeframeSnapshot};

/// The named setups the scanner can fire.
///
/// The `Display` token is the alert tag and the cooldown key component, so
/// it stays short and stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetupKind {
    /// Fast 15m momentum expansion backed by the 1h trend.
    SmallCapBreakout,
    /// Multi-day continuation: aligned 1h/4h/1d trend plus a closed-bar
    /// breakout confirmation.
    SwingContinuation,
}

impl fmt::Display for SetupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupKind::SmallCapBreakout => f.write_str("SMALL"),
            SetupKind::SwingContinuation => f.write_str("SWING"),
        }
    }
}

/// Every numeric threshold the setups compare against.
///
/// Kept as one struct of named fields so a deployment variant is a config
/// preset, never a code fork. Tolerances exist to absorb float-adjacent
/// near-misses: a fast average sitting at 0.995 of the slow one is still a
/// hold, not a miss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetupParams {
    /// Small-cap RSI band on 15m, inclusive.
    pub small_rsi_min: f64,
    pub small_rsi_max: f64,
    /// Small-cap 15m volume-ratio band, inclusive.
    pub small_vol_min: f64,
    pub small_vol_max: f64,
    /// Swing RSI band on 1h, inclusive.
    pub swing_rsi_min: f64,
    pub swing_rsi_max: f64,
    /// Swing 1h volume-ratio band, inclusive.
    pub swing_vol_min: f64,
    pub swing_vol_max: f64,
    /// Multiplicative slack on moving-average comparisons.
    pub ma_tolerance: f64,
    /// Multiplicative slack on the Bollinger expansion comparison.
    pub bb_tolerance: f64,
    /// Minimum quiet interval between two SMALL alerts for one symbol.
    pub small_cooldown_ms: u64,
    /// Minimum quiet interval between two SWING alerts for one symbol.
    pub swing_cooldown_ms: u64,
}

impl Default for SetupParams {
    fn default() -> Self {
        Self {
            small_rsi_min: 55.0,
            small_rsi_max: 80.0,
            small_vol_min: 1.3,
            small_vol_max: 6.0,
            swing_rsi_min: 45.0,
            swing_rsi_max: 60.0,
            swing_vol_min: 0.8,
            swing_vol_max: 3.0,
            ma_tolerance: 0.99,
            bb_tolerance: 0.98,
            small_cooldown_ms: 8 * 60 * 1000,
            swing_cooldown_ms: 10 * 60 * 1000,
        }
    }
}

impl SetupParams {
    pub fn cooldown_ms(&self, kind: SetupKind) -> u64 {
        match kind {
            SetupKind::SmallCapBreakout => self.small_cooldown_ms,
            SetupKind::SwingContinuation => self.swing_cooldown_ms,
        }
    }
}

/// A confirmed setup with the readings the alert text reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal {
    pub kind: SetupKind,
    /// Latest closed close on the setup's driving timeframe.
    pub price: f64,
    pub rsi: f64,
    pub volume_ratio: f64,
}

/// Evaluates every setup against one symbol's snapshot.
///
/// Pure conjunctions over the latest closed-bar readings. A setup whose
/// required timeframes are missing is skipped without comment; short
/// history is routine, not reportable.
pub fn evaluate(snapshot: &SymbolSnapshot, params: &SetupParams) -> Vec<Signal> {
    let mut signals = Vec::with_capacity(2);
    if let Some(signal) = small_cap_breakout(snapshot, params) {
        signals.push(signal);
    }
    if let Some(signal) = swing_continuation(snapshot, params) {
        signals.push(signal);
    }
    signals
}

/// Did the latest closed bar break the prior bar's high on rising volume?
fn continuity(tf: &TimeframeSnapshot) -> bool {
    tf.close > tf.prev_high && tf.volume > tf.prev_volume
}

fn small_cap_breakout(snapshot: &SymbolSnapshot, p: &SetupParams) -> Option<Signal> {
    let m15 = snapshot.m15?;
    let h1 = snapshot.h1?;

    let confirmed = (p.small_rsi_min..=p.small_rsi_max).contains(&m15.rsi)
        && (p.small_vol_min..=p.small_vol_max).contains(&m15.volume_ratio)
        && m15.ema_fast >= m15.sma_slow * p.ma_tolerance
        && m15.bb_width >= m15.bb_width_prev * p.bb_tolerance
        && h1.close >= h1.sma_slow * p.ma_tolerance;
    if !confirmed {
        return None;
    }

    debug!(
        rsi = m15.rsi,
        volume_ratio = m15.volume_ratio,
        bb_width = m15.bb_width,
        "small-cap breakout confirmed"
    );
    Some(Signal {
        kind: SetupKind::SmallCapBreakout,
        price: m15.close,
        rsi: m15.rsi,
        volume_ratio: m15.volume_ratio,
    })
}

fn swing_continuation(snapshot: &SymbolSnapshot, p: &SetupParams) -> Option<Signal> {
    let h1 = snapshot.h1?;
    let h4 = snapshot.h4?;
    let d1 = snapshot.d1?;

    let confirmed = (p.swing_rsi_min..=p.swing_rsi_max).contains(&h1.rsi)
        && (p.swing_vol_min..=p.swing_vol_max).contains(&h1.volume_ratio)
        && h1.bb_width >= h1.bb_width_prev * p.bb_tolerance
        && h1.ma_mid >= h1.ma_long * p.ma_tolerance
        && h4.ema_fast >= h4.sma_slow * p.ma_tolerance
        && h4.ma_mid >= h4.ma_long * p.ma_tolerance
        && h4.macd_hist > 0.0
        && d1.close >= d1.sma_slow * p.ma_tolerance
        && continuity(&h1);
    if !confirmed {
        return None;
    }

    debug!(
        rsi = h1.rsi,
        volume_ratio = h1.volume_ratio,
        macd_hist = h4.macd_hist,
        "swing continuation confirmed"
    );
    Some(Signal {
        kind: SetupKind::SwingContinuation,
        price: h1.close,
        rsi: h1.rsi,
        volume_ratio: h1.volume_ratio,
    })
}
