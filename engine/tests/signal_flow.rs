use engine::candle::Candle;
use engine::cooldown::CooldownTracker;
use engine::setup::{self, SetupKind, SetupParams};
use engine::snapshot::{IndicatorParams, SymbolSnapshot, TimeframeSnapshot};

fn bar(i: usize, close: f64, volume: f64) -> Candle {
    Candle {
        open_time: i as u64 * 60_000,
        open: close,
        high: close,
        low: close,
        close,
        volume,
        close_time: (i as u64 + 1) * 60_000 - 1,
        quote_volume: close * volume,
    }
}

/// Fifty flat bars, then ten bars climbing 5% in total, with the volume
/// spike arriving only on the final bar.
fn breakout_series() -> Vec<Candle> {
    let mut bars: Vec<Candle> = (0..50).map(|i| bar(i, 100.0, 1.0)).collect();
    for step in 1..=10 {
        let close = 100.0 + 0.5 * step as f64;
        let volume = if step == 10 { 8.0 } else { 1.0 };
        bars.push(bar(49 + step, close, volume));
    }
    bars
}

/// Wide bands so the walk below is gated by trend, continuity and history
/// alone; the band checks themselves are covered by unit tests.
fn wide_band_params() -> SetupParams {
    SetupParams {
        swing_rsi_min: 0.0,
        swing_rsi_max: 100.0,
        swing_vol_max: 50.0,
        ..SetupParams::default()
    }
}

#[test]
fn breakout_fires_once_and_the_cooldown_suppresses_the_rerun() {
    let indicators = IndicatorParams::default();
    let params = wide_band_params();
    let mut cooldowns = CooldownTracker::new(params);
    let bars = breakout_series();

    // Replay the series bar by bar the way successive scan cycles would see
    // it. The confirmation (close above prior high on rising volume) is
    // only true on the spike bar, so exactly one alert may fire.
    let mut fired = Vec::new();
    for end in 2..=bars.len() {
        let tf = TimeframeSnapshot::compute(&bars[..end], &indicators);
        let snapshot = SymbolSnapshot {
            m15: None,
            h1: tf,
            h4: tf,
            d1: tf,
        };
        let now_ms = end as u64 * 1_000;
        for signal in setup::evaluate(&snapshot, &params) {
            if cooldowns.allowed("ALTUSDT", signal.kind, now_ms) {
                cooldowns.mark("ALTUSDT", signal.kind, now_ms);
                fired.push((end, signal.kind));
            }
        }
    }

    assert_eq!(fired, vec![(bars.len(), SetupKind::SwingContinuation)]);

    // An immediate re-run over the same data still evaluates true, and the
    // ledger is what keeps it quiet.
    let tf = TimeframeSnapshot::compute(&bars, &indicators);
    let snapshot = SymbolSnapshot {
        m15: None,
        h1: tf,
        h4: tf,
        d1: tf,
    };
    let signals = setup::evaluate(&snapshot, &params);
    assert_eq!(signals.len(), 1);
    let now_ms = (bars.len() as u64 + 1) * 1_000;
    assert!(!cooldowns.allowed("ALTUSDT", signals[0].kind, now_ms));
}

#[test]
fn short_history_reports_no_signal_instead_of_failing() {
    let indicators = IndicatorParams::default();
    let bars: Vec<Candle> = (0..10).map(|i| bar(i, 100.0 + i as f64, 2.0)).collect();

    let tf = TimeframeSnapshot::compute(&bars, &indicators);
    assert!(tf.is_none());

    let snapshot = SymbolSnapshot {
        m15: tf,
        h1: tf,
        h4: tf,
        d1: tf,
    };
    assert!(setup::evaluate(&snapshot, &wide_band_params()).is_empty());
}
