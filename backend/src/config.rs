use std::env;
use std::time::Duration;

use engine::setup::SetupParams;
use engine::snapshot::IndicatorParams;

/// Scanner configuration derived from environment variables.
///
/// Everything has a default so a bare container boots; the only values a
/// deployment normally sets are the Telegram credentials and the port.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Telegram bot token. Absent ⇒ alerts degrade to log-only dispatch.
    pub telegram_token: Option<String>,

    /// Telegram chat the alerts go to. Absent ⇒ log-only dispatch.
    pub telegram_chat_id: Option<String>,

    /// Liveness port for the supervisor's health probe.
    pub port: u16,

    /// Exchange REST endpoint. Overridable so tests can point the client
    /// at a local mock server.
    pub exchange_http_endpoint: String,

    // =========================
    // Universe configuration
    // =========================
    /// How many quote-volume-ranked pairs make the scan universe.
    ///
    /// This bounds the whole cycle: every pair costs four kline requests,
    /// so the request volume per cycle is `4 × top_n`.
    pub top_n: usize,

    /// Re-rank the universe when the last snapshot is older than this.
    ///
    /// Ranking churn is slow; refreshing every cycle would double-tax the
    /// ticker endpoint for no signal benefit.
    pub universe_refresh: Duration,

    /// Pause before retrying when the exchange returns an empty universe.
    pub universe_retry: Duration,

    // =========================
    // Scan configuration
    // =========================
    /// Bars requested per timeframe. 210 leaves ample closed history above
    /// the evaluator's 50-bar floor after the forming bar is dropped.
    pub kline_limit: u32,

    /// Sleep between the end of one full cycle and the start of the next.
    pub scan_interval: Duration,

    /// Per-request network timeout.
    ///
    /// Must stay in single-digit seconds: the cycle's fan-in waits for
    /// every symbol, so one hung request would otherwise stall the loop.
    pub request_timeout: Duration,

    /// Pause before the supervisor restarts a crashed scan loop.
    pub restart_backoff: Duration,

    /// Indicator periods shared by every timeframe.
    pub indicators: IndicatorParams,

    /// Setup thresholds and cooldown windows.
    pub setups: SetupParams,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            telegram_token: env_opt("TELEGRAM_TOKEN"),
            telegram_chat_id: env_opt("CHAT_ID"),
            port: env_u16("PORT", 50_000),
            exchange_http_endpoint: env_str("BINANCE_HTTP", "https://api.binance.com"),

            top_n: env_usize("TOP_N", 80),
            universe_refresh: Duration::from_secs(env_u64("UNIVERSE_REFRESH_SECS", 15 * 60)),
            universe_retry: Duration::from_secs(env_u64("UNIVERSE_RETRY_SECS", 60)),

            kline_limit: env_u32("KLINE_LIMIT", 210),
            scan_interval: Duration::from_secs(env_u64("SCAN_INTERVAL_SECS", 10)),
            request_timeout: Duration::from_secs(env_u64("REQ_TIMEOUT_SECS", 8)),
            restart_backoff: Duration::from_secs(env_u64("RESTART_BACKOFF_SECS", 5)),

            indicators: IndicatorParams::default(),
            setups: SetupParams::default(),
        }
    }

    /// True when both Telegram values are present and dispatch is real.
    pub fn telegram_configured(&self) -> bool {
        self.telegram_token.is_some() && self.telegram_chat_id.is_some()
    }
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
