use thiserror::Error;

/// Failure talking to the check endpoint. The message is shown to the user
/// as-is in the result area.
#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl failed (connect, timeout, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Endpoint answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Body was not a check result.
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The blocking task running the request died.
    #[error("request task failed: {0}")]
    Task(String),
}
