//! Scan orchestrator.
//!
//! Owns the symbol universe, fans one scan task out per symbol each cycle,
//! and funnels every confirmed setup through the cooldown gate before it
//! reaches the notifier.
//!
//! Data flow:
//! Tickers -> universe -> per-symbol workers -> evaluator -> cooldown -> notifier

pub mod worker;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use engine::cooldown::CooldownTracker;
use engine::setup::Signal;

use crate::config::AppConfig;
use crate::logger::warn_if_slow;
use crate::market::CandleSource;
use crate::market::universe::select_universe;
use crate::metrics::counters::Counters;
use crate::notify::{Notifier, format};
use crate::time::now_ms;

pub use worker::{ScanOutcome, scan_symbol};

struct UniverseState {
    symbols: Vec<String>,
    refreshed_at_ms: u64,
}

pub struct Scanner<C> {
    cfg: Arc<AppConfig>,
    client: Arc<C>,
    notifier: Arc<dyn Notifier>,
    cooldowns: Mutex<CooldownTracker>,
    universe: Mutex<UniverseState>,
    counters: Counters,
    /// The online notice goes out once per process, not once per restart.
    announced: AtomicBool,
}

impl<C: CandleSource> Scanner<C> {
    pub fn new(
        cfg: Arc<AppConfig>,
        client: Arc<C>,
        notifier: Arc<dyn Notifier>,
        counters: Counters,
    ) -> Self {
        let cooldowns = Mutex::new(CooldownTracker::new(cfg.setups));
        Self {
            cfg,
            client,
            notifier,
            cooldowns,
            universe: Mutex::new(UniverseState {
                symbols: Vec::new(),
                refreshed_at_ms: 0,
            }),
            counters,
            announced: AtomicBool::new(false),
        }
    }

    /// Bootstraps the universe, then scans on a fixed cadence until the
    /// task is dropped.
    pub async fn run(&self) -> Result<()> {
        loop {
            if self.refresh_universe().await > 0 {
                break;
            }
            warn!(
                retry_ms = self.cfg.universe_retry.as_millis(),
                "no symbols in universe; retrying"
            );
            tokio::time::sleep(self.cfg.universe_retry).await;
        }

        let universe_len = self.universe.lock().symbols.len();
        if !self
            .announced
            .swap(true, std::sync::atomic::Ordering::SeqCst)
        {
            self.notifier.send(&format::startup_text(universe_len)).await;
        }

        let mut ticker = interval(self.cfg.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            symbols = universe_len,
            every_ms = self.cfg.scan_interval.as_millis(),
            "scan loop started"
        );

        loop {
            ticker.tick().await;
            self.cycle().await;
        }
    }

    /// One full pass over the universe.
    pub async fn cycle(&self) {
        if self.universe_is_stale(now_ms()) {
            self.refresh_universe().await;
        }
        let symbols = self.universe.lock().symbols.clone();

        // A fan-in slower than the cadence means tick skips; worth a warning
        // before the loop quietly degrades.
        let outcomes = warn_if_slow(
            "scan_fan_in",
            self.cfg.scan_interval,
            join_all(
                symbols
                    .iter()
                    .map(|symbol| scan_symbol(self.client.as_ref(), symbol, &self.cfg)),
            ),
        )
        .await;

        let mut fired = 0usize;
        let mut quiet = 0usize;
        let mut short_history = 0usize;
        let mut no_data = 0usize;

        for (symbol, outcome) in symbols.iter().zip(outcomes) {
            match outcome {
                ScanOutcome::Fired(signals) => {
                    fired += signals.len();
                    for signal in signals {
                        self.counters
                            .scan_signals
                            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        self.dispatch(symbol, &signal).await;
                    }
                }
                ScanOutcome::Quiet => quiet += 1,
                ScanOutcome::ShortHistory => {
                    self.counters
                        .scan_skip_short_history
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    short_history += 1;
                }
                ScanOutcome::NoData => {
                    self.counters
                        .scan_skip_no_data
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    no_data += 1;
                }
            }
        }

        self.counters
            .scan_cycles
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.counters
            .scan_symbols
            .fetch_add(symbols.len() as u64, std::sync::atomic::Ordering::Relaxed);

        info!(
            symbols = symbols.len(),
            fired, quiet, short_history, no_data, "scan cycle complete"
        );
    }

    /// Sends one confirmed signal, unless its (symbol, kind) cooldown is
    /// still active. The cooldown is marked only after the notifier reports
    /// success, so a failed delivery gets retried next cycle.
    async fn dispatch(&self, symbol: &str, signal: &Signal) {
        if !self.cooldowns.lock().allowed(symbol, signal.kind, now_ms()) {
            self.counters
                .scan_skip_cooldown
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            debug!(symbol = %symbol, kind = %signal.kind, "alert suppressed by cooldown");
            return;
        }

        let text = format::alert_text(symbol, signal);
        if self.notifier.send(&text).await {
            self.counters
                .scan_alerts_sent
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            self.cooldowns.lock().mark(symbol, signal.kind, now_ms());
        } else {
            self.counters
                .scan_send_failures
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    }

    /// Re-ranks the universe from a fresh ticker snapshot. On failure, or
    /// when the exchange answers with nothing usable, the previous set is
    /// kept so a transient outage never blanks the scan.
    async fn refresh_universe(&self) -> usize {
        match self.client.fetch_tickers().await {
            Ok(tickers) => {
                let symbols = select_universe(&tickers, self.cfg.top_n);
                if symbols.is_empty() {
                    warn!("ticker snapshot yielded no tradable symbols; keeping previous set");
                    return self.universe.lock().symbols.len();
                }

                info!(symbols = symbols.len(), "universe refreshed");
                let mut state = self.universe.lock();
                state.symbols = symbols;
                state.refreshed_at_ms = now_ms();
                state.symbols.len()
            }
            Err(e) => {
                warn!(error = %e, "universe refresh failed; keeping previous set");
                self.universe.lock().symbols.len()
            }
        }
    }

    fn universe_is_stale(&self, now_ms: u64) -> bool {
        let state = self.universe.lock();
        state.symbols.is_empty()
            || now_ms.saturating_sub(state.refreshed_at_ms)
                >= self.cfg.universe_refresh.as_millis() as u64
    }
}

/// Runs the scan loop under a restart supervisor.
///
/// Each attempt gets its own task, so an error exit or a panic is logged
/// and the loop comes back after `backoff` instead of taking the process
/// down. Only runtime shutdown stops the supervisor.
pub fn start_scan_loop<C>(scanner: Arc<Scanner<C>>, backoff: Duration) -> JoinHandle<()>
where
    C: CandleSource + 'static,
{
    tokio::spawn(async move {
        loop {
            let run = tokio::spawn({
                let scanner = Arc::clone(&scanner);
                async move { scanner.run().await }
            });
            match run.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = ?e, "scan loop crashed"),
                Err(e) if e.is_panic() => error!(error = %e, "scan loop panicked"),
                // Cancelled: the runtime is shutting down.
                Err(_) => break,
            }
            tokio::time::sleep(backoff).await;
        }
    })
}
