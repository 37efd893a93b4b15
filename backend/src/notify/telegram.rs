use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::Notifier;

/// Production Bot API host; tests point at a dead local port instead.
pub const TELEGRAM_API: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    http: Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: &str,
        token: &str,
        chat_id: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: format!("{api_base}/bot{token}/sendMessage"),
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> bool {
        let form = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "HTML"),
            ("disable_web_page_preview", "true"),
        ];

        // The URL carries the bot token, so it never goes into a log line.
        let sent = self.http.post(&self.url).form(&form).send().await;
        match sent.and_then(|r| r.error_for_status()) {
            Ok(_) => {
                debug!(chars = text.len(), "alert delivered");
                true
            }
            Err(e) => {
                warn!(error = %e, "alert delivery failed");
                false
            }
        }
    }
}

/// Stands in when Telegram credentials are absent.
///
/// The alert lands in the process log and the pipeline treats it as
/// delivered, so cooldowns still arm and a misconfigured deployment pages
/// once per window instead of every cycle.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> bool {
        info!(alert = %text, "alert (telegram dispatch disabled)");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[tokio::test]
    async fn test_log_notifier_logs_and_reports_success() {
        assert!(LogNotifier.send("[SMALL] BTCUSDT").await);
        assert!(logs_contain("telegram dispatch disabled"));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_contained() {
        // Discard port: the connection is refused and send must come back
        // false without panicking.
        let notifier = TelegramNotifier::new(
            "http://127.0.0.1:9",
            "not-a-token",
            "42".into(),
            Duration::from_millis(250),
        )
        .unwrap();
        assert!(!notifier.send("[SWING] ETHUSDT").await);
    }
}
