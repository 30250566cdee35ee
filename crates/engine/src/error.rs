use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The provider could not be reached or rejected the request.
    #[error("Rate data unavailable: {0}")]
    DataUnavailable(#[from] api_client::error::ApiError),

    #[error("Invalid refresh request: {0}")]
    InvalidRequest(#[from] core_types::CoreError),
}
