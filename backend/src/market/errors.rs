use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("numeric parse error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}
