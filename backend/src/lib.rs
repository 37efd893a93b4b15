pub mod config;
pub mod health;
pub mod market;
pub mod metrics;
pub mod notify;
pub mod scanner;

pub mod logger;
pub mod time;
