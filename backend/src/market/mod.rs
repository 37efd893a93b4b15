pub mod client;
pub mod errors;
pub mod types;
pub mod universe;

pub use client::{BinanceClient, CandleSource};
pub use errors::MarketError;
