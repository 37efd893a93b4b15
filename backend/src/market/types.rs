use engine::candle::Candle;
use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::market::errors::MarketError;

/// One kline row as the exchange sends it: a positional JSON array with
/// prices and volumes as numeric strings. The trailing columns (trade
/// count, taker splits, reserved) are ignored on decode.
#[derive(Debug, Deserialize)]
pub struct KlineRow(
    pub u64,    // open time, ms
    pub String, // open
    pub String, // high
    pub String, // low
    pub String, // close
    pub String, // base volume
    pub u64,    // close time, ms
    pub String, // quote volume
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
);

impl TryFrom<KlineRow> for Candle {
    type Error = MarketError;

    fn try_from(row: KlineRow) -> Result<Self, Self::Error> {
        Ok(Candle {
            open_time: row.0,
            open: row.1.parse()?,
            high: row.2.parse()?,
            low: row.3.parse()?,
            close: row.4.parse()?,
            volume: row.5.parse()?,
            close_time: row.6,
            quote_volume: row.7.parse()?,
        })
    }
}

/// The slice of the exchange-wide 24h ticker that universe ranking reads.
/// Unknown fields in the row are skipped by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker24h {
    pub symbol: String,

    /// Quote-asset turnover as a numeric string.
    #[serde(rename = "quoteVolume", default)]
    pub quote_volume: String,
}

impl Ticker24h {
    /// Parsed turnover; a missing or malformed value ranks as zero instead
    /// of dropping the row.
    pub fn turnover(&self) -> f64 {
        self.quote_volume.trim().parse().unwrap_or(0.0)
    }
}
