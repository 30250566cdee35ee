use thiserror::Error;

/// Every variant means the requested data is unavailable for this refresh.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the rate provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The rate provider returned HTTP {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
