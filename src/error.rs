use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SettlementError>;
