// Currency Basics - Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurrencyError>;

/// Failures talking to the currency API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The server answered but flagged the request as failed
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored snapshot '{key}' failed its checksum")]
    CorruptSnapshot { key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
