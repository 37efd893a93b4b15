//! Indicator math over plain `f64` close/volume series.
//!
//! Every function here is total and synchronous: short input produces the
//! documented degenerate value instead of an error, so history gating lives
//! in one place (the snapshot layer) and the math never panics mid-scan.

/// Division guard for flat stretches; matches the scan path's `+1e-12`.
pub const EPSILON: f64 = 1e-12;

/// Simple moving average with a shrinking leading window.
///
/// `out[i]` is the mean of the trailing `min(i + 1, window)` values, so the
/// series is defined from the first element on and settles into a true
/// `window`-bar mean once enough history exists. Empty input or a zero
/// window returns an empty series.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        out.push(sum / (i + 1).min(window) as f64);
    }
    out
}

/// Exponential moving average seeded on the first value.
///
/// `e_i = α·x_i + (1 − α)·e_{i−1}` with `α = 2 / (span + 1)`. Output is
/// index-aligned with the input; empty input returns an empty series.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut e = seed;
    out.push(e);
    for &x in &values[1..] {
        e = alpha * x + (1.0 - alpha) * e;
        out.push(e);
    }
    out
}

/// Wilder-smoothed relative strength index.
///
/// Needs `period + 1` closes for a real reading; anything shorter returns a
/// length-L series of the neutral 50.0 so range checks simply stay false.
/// The first `period` slots of a real series are front-padded with 50.0 to
/// keep the output index-aligned with the input. Average gain/loss seed over
/// the first `period` deltas, then one Wilder step
/// (`avg = (avg·(period−1) + new) / period`) per remaining delta. A small
/// epsilon on the average loss guards the all-gain division, rather than
/// Wilder's special-cased 100.0.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let len = closes.len();
    if period == 0 || len < period + 1 {
        return vec![50.0; len];
    }

    let mut gains = Vec::with_capacity(len - 1);
    let mut losses = Vec::with_capacity(len - 1);
    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut out = vec![50.0; period];
    out.push(rsi_from_averages(avg_gain, avg_loss));
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i]) / period as f64;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / (avg_loss + EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}

/// Bollinger band series over a trailing window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub mid: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn is_empty(&self) -> bool {
        self.mid.is_empty()
    }

    /// Relative band width at index `i` from the back (0 = latest bar).
    ///
    /// `(upper − lower) / (mid + ε)`; `None` when the series does not reach
    /// back that far. The scan path compares width 0 against width 1 to
    /// detect expansion.
    pub fn width_back(&self, i: usize) -> Option<f64> {
        let idx = self.mid.len().checked_sub(i + 1)?;
        Some((self.upper[idx] - self.lower[idx]) / (self.mid[idx] + EPSILON))
    }
}

/// Bollinger bands: mid = trailing-window mean, band = mid ± `mult` ×
/// population standard deviation of the same window.
///
/// Series shorter than `window` are undefined: all three output series come
/// back empty and callers must check. From `window` bars on, the output is
/// length-L and index-aligned (earlier indices use the shrinking window,
/// like [`sma`]).
pub fn bollinger(values: &[f64], window: usize, mult: f64) -> BollingerBands {
    if window == 0 || values.len() < window {
        return BollingerBands::default();
    }
    let mut bands = BollingerBands {
        upper: Vec::with_capacity(values.len()),
        mid: Vec::with_capacity(values.len()),
        lower: Vec::with_capacity(values.len()),
    };
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let win = &values[start..=i];
        let mean = win.iter().sum::<f64>() / win.len() as f64;
        let variance = win.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / win.len() as f64;
        let dev = mult * variance.sqrt();
        bands.mid.push(mean);
        bands.upper.push(mean + dev);
        bands.lower.push(mean - dev);
    }
    bands
}

/// Latest MACD histogram value: `EMA(fast) − EMA(slow)` gives the MACD
/// line, `EMA(signal)` of that line gives the signal line, histogram is
/// their difference at the last index.
///
/// Inputs shorter than `slow + signal` bars have not warmed both smoothing
/// stages up and return the degenerate 0.0, which no `> 0` regime check can
/// mistake for a trend.
pub fn macd_histogram(values: &[f64], fast: usize, slow: usize, signal: usize) -> f64 {
    if values.len() < slow + signal {
        return 0.0;
    }
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);
    match (macd_line.last(), signal_line.last()) {
        (Some(m), Some(s)) => m - s,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_sma_shrinks_until_the_window_fills() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 1.0).abs() < TOL);
        assert!((out[1] - 1.5).abs() < TOL);
        assert!((out[2] - 2.5).abs() < TOL);
        assert!((out[3] - 3.5).abs() < TOL);
    }

    #[test]
    fn test_sma_empty_and_zero_window() {
        assert!(sma(&[], 5).is_empty());
        assert!(sma(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_ema_follows_a_step_up() {
        // span 3 -> alpha 0.5: seed 1.0, then 0.5*3 + 0.5*1 = 2.0
        let out = ema(&[1.0, 3.0], 3);
        assert!((out[0] - 1.0).abs() < TOL);
        assert!((out[1] - 2.0).abs() < TOL);
    }

    #[test]
    fn test_ema_empty_input() {
        assert!(ema(&[], 9).is_empty());
    }

    #[test]
    fn test_rsi_short_input_is_all_neutral() {
        let out = rsi(&[1.0, 2.0, 3.0], 14);
        assert_eq!(out, vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn test_rsi_is_index_aligned_and_front_padded() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), closes.len());
        assert!(out[..14].iter().all(|&v| v == 50.0));
        assert!(out[14] != 50.0);
    }

    #[test]
    fn test_rsi_rises_toward_100_on_a_steady_climb() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);
        let last = *out.last().unwrap();
        assert!(last > 99.0, "climbing series should pin RSI high, got {last}");
    }

    #[test]
    fn test_rsi_falls_toward_0_on_a_steady_drop() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let out = rsi(&closes, 14);
        let last = *out.last().unwrap();
        assert!(last < 1.0, "falling series should pin RSI low, got {last}");
    }

    #[test]
    fn test_bollinger_undefined_below_window() {
        let bands = bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bands.is_empty());
        assert!(bands.width_back(0).is_none());
    }

    #[test]
    fn test_bollinger_mid_matches_sma() {
        let closes: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin() + 10.0).collect();
        let bands = bollinger(&closes, 20, 2.0);
        let mids = sma(&closes, 20);
        assert_eq!(bands.mid.len(), mids.len());
        // The two accumulate in different orders, so compare within float
        // noise rather than bitwise.
        for (band_mid, mean) in bands.mid.iter().zip(&mids) {
            assert!((band_mid - mean).abs() < TOL);
        }
    }

    #[test]
    fn test_bollinger_flat_series_has_zero_width() {
        let bands = bollinger(&[5.0; 25], 20, 2.0);
        let width = bands.width_back(0).unwrap();
        assert!(width.abs() < TOL);
        assert_eq!(bands.upper.last(), bands.lower.last());
    }

    #[test]
    fn test_bollinger_widens_on_a_spike() {
        let mut closes = vec![10.0; 30];
        closes.push(12.0);
        let bands = bollinger(&closes, 20, 2.0);
        let now = bands.width_back(0).unwrap();
        let prev = bands.width_back(1).unwrap();
        assert!(now > prev, "spike should expand the band: {now} <= {prev}");
    }

    #[test]
    fn test_macd_histogram_degenerate_below_minimum() {
        let closes: Vec<f64> = (0..34).map(|i| i as f64).collect();
        // slow + signal = 35 with defaults
        assert_eq!(macd_histogram(&closes, 12, 26, 9), 0.0);
    }

    #[test]
    fn test_macd_histogram_positive_in_an_uptrend() {
        // Flat warmup then a climb: fast EMA pulls ahead of slow EMA and the
        // histogram opens positive.
        let mut closes = vec![100.0; 30];
        closes.extend((0..30).map(|i| 100.0 + i as f64 * 2.0));
        assert!(macd_histogram(&closes, 12, 26, 9) > 0.0);
    }
}
