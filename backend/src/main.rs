use std::sync::Arc;

use backend::{
    config::AppConfig,
    health,
    logger::init_tracing,
    market::BinanceClient,
    metrics::counters::Counters,
    notify::{LogNotifier, Notifier, TelegramNotifier, telegram::TELEGRAM_API},
    scanner::{Scanner, start_scan_loop},
};

/// Picks the real Telegram notifier when both credentials are present,
/// otherwise a log-only stand-in so the scanner still runs end to end.
fn build_notifier(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    if let (Some(token), Some(chat_id)) = (&cfg.telegram_token, &cfg.telegram_chat_id) {
        let notifier =
            TelegramNotifier::new(TELEGRAM_API, token, chat_id.clone(), cfg.request_timeout)?;
        return Ok(Arc::new(notifier));
    }

    tracing::warn!("TELEGRAM_TOKEN or CHAT_ID missing; alerts stay in the process log");
    Ok(Arc::new(LogNotifier))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    let cfg = Arc::new(AppConfig::from_env());

    tracing::info!(
        top_n = cfg.top_n,
        port = cfg.port,
        telegram = cfg.telegram_configured(),
        "Starting market scanner..."
    );

    let client = Arc::new(BinanceClient::new(
        cfg.exchange_http_endpoint.clone(),
        cfg.request_timeout,
    )?);
    let notifier = build_notifier(&cfg)?;

    let scanner = Arc::new(Scanner::new(
        Arc::clone(&cfg),
        client,
        notifier,
        Counters::default(),
    ));
    start_scan_loop(scanner, cfg.restart_backoff);

    let port = cfg.port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            tracing::error!(error = ?e, "health endpoint failed");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    Ok(())
}
