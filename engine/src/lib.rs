pub mod candle;
pub mod cooldown;
pub mod series;
pub mod setup;
pub mod snapshot;
