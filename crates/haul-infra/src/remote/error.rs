use thiserror::Error;

/// Failure talking to the endpoint
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server status {0}")]
    Status(u16),

    #[error("decode: {0}")]
    Decode(String),

    #[error("no endpoint configured")]
    NoEndpoint,
}

impl RemoteError {
    /// Only connection-level failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Timeout(_) | RemoteError::Network(_))
    }
}
