use std::time::Duration;

use async_trait::async_trait;
use engine::candle::{Candle, Interval};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::market::errors::MarketError;
use crate::market::types::{KlineRow, Ticker24h};

/// The exchange rejects requests without a browser-looking agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; MarketScanner/1.0)";

/// Read side of the exchange REST API.
///
/// The scanner is generic over this seam so tests feed it canned series
/// instead of a live endpoint.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Most-recent-last klines for one symbol and interval. The final row
    /// may still be forming; callers decide what to do with it.
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketError>;

    /// Exchange-wide 24h ticker snapshot, used for universe ranking.
    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, MarketError>;
}

#[derive(Clone)]
pub struct BinanceClient {
    http: Client,
    url: String,
}

impl BinanceClient {
    /// `timeout` bounds every request end to end; the cycle's fan-in waits
    /// on the slowest symbol, so this is what keeps a hung socket from
    /// stalling the whole loop.
    pub fn new(url: String, timeout: Duration) -> Result<Self, MarketError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, url })
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    #[instrument(
        skip(self),
        fields(symbol = %symbol, interval = %interval),
        level = "debug"
    )]
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketError> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.url,
            symbol,
            interval.as_str(),
            limit
        );

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let rows: Vec<KlineRow> = resp.json().await?;

        debug!(rows = rows.len(), "klines fetched");

        rows.into_iter().map(Candle::try_from).collect()
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_tickers(&self) -> Result<Vec<Ticker24h>, MarketError> {
        let url = format!("{}/api/v3/ticker/24hr", self.url);

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let tickers: Vec<Ticker24h> = resp.json().await?;

        debug!(tickers = tickers.len(), "ticker snapshot fetched");

        Ok(tickers)
    }
}
