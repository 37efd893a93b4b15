use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// Minimal counters for operational visibility.
#[derive(Clone, Default)]
pub struct Counters {
    pub scan_cycles: Arc<AtomicU64>,
    pub scan_symbols: Arc<AtomicU64>,

    pub scan_signals: Arc<AtomicU64>,
    pub scan_alerts_sent: Arc<AtomicU64>,
    pub scan_send_failures: Arc<AtomicU64>,

    // quiet reasons
    pub scan_skip_cooldown: Arc<AtomicU64>,
    pub scan_skip_short_history: Arc<AtomicU64>,
    pub scan_skip_no_data: Arc<AtomicU64>,
}
