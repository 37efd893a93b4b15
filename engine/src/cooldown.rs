use std::collections::HashMap;

use crate::setup::{SetupKind, SetupParams};

/// Last-fired ledger gating repeat alerts per (symbol, setup).
///
/// Growth is bounded by |universe| × |setup kinds|, so nothing is ever
/// evicted. The ledger lives in memory only: a process restart re-arms
/// every cooldown, which is the accepted reset semantics.
///
/// Time is an explicit argument on both calls; the owner reads the clock
/// once per scan and tests drive it directly.
#[derive(Debug)]
pub struct CooldownTracker {
    last_fired: HashMap<(String, SetupKind), u64>,
    params: SetupParams,
}

impl CooldownTracker {
    pub fn new(params: SetupParams) -> Self {
        Self {
            last_fired: HashMap::new(),
            params,
        }
    }

    /// True when this (symbol, kind) pair may alert at `now_ms`.
    ///
    /// A pair that has never fired is always allowed.
    pub fn allowed(&self, symbol: &str, kind: SetupKind, now_ms: u64) -> bool {
        match self.last_fired.get(&(symbol.to_owned(), kind)) {
            Some(&last_ms) => now_ms.saturating_sub(last_ms) >= self.params.cooldown_ms(kind),
            None => true,
        }
    }

    /// Records `now_ms` as the pair's last-fired time.
    ///
    /// Called only after a dispatch reported success, so a failed send does
    /// not burn the cooldown window.
    pub fn mark(&mut self, symbol: &str, kind: SetupKind, now_ms: u64) {
        self.last_fired.insert((symbol.to_owned(), kind), now_ms);
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}
