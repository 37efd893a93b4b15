//! Universe selection: which pairs are worth scanning this cycle.

use tracing::debug;

use crate::market::types::Ticker24h;

/// Only spot pairs quoted in USDT are scanned.
const QUOTE_SUFFIX: &str = "USDT";

/// Substrings marking leveraged tokens, stable-stable pairs and other
/// symbols that can never produce a tradable setup.
const DENYLIST: [&str; 18] = [
    "UP", "DOWN", "BULL", "BEAR", "BUSD", "FDUSD", "TUSD", "USDC", "USD1", "USDE", "PERP",
    "_PERP", "EUR", "EURS", "CEUR", "XUSD", "USDX", "GUSD",
];

/// Filters and ranks a 24h ticker snapshot into the scan universe.
///
/// USDT-quoted symbols only, denylist applied as substring matches, ranked
/// by quote turnover descending and truncated to `top_n`. Pure so the
/// listing policy is testable without a client.
pub fn select_universe(tickers: &[Ticker24h], top_n: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, f64)> = tickers
        .iter()
        .filter(|t| t.symbol.ends_with(QUOTE_SUFFIX))
        .filter(|t| !DENYLIST.iter().any(|blocked| t.symbol.contains(blocked)))
        .map(|t| (t.symbol.as_str(), t.turnover()))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_n);

    debug!(selected = ranked.len(), "universe ranked");

    ranked
        .into_iter()
        .map(|(symbol, _)| symbol.to_owned())
        .collect()
}
