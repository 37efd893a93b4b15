pub mod format;
pub mod telegram;

use async_trait::async_trait;

pub use telegram::{LogNotifier, TelegramNotifier};

/// Abstraction over the outbound alert channel (Telegram, log-only, test
/// recorders).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one formatted message and reports plain success or failure.
    ///
    /// Implementations log their own transport errors and never propagate
    /// them; a failed alert must not disturb the scan cycle, and the next
    /// cycle re-fires naturally once condition and cooldown allow.
    async fn send(&self, text: &str) -> bool;
}
