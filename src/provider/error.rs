//! Provider failures.

/// Errors raised while talking to the completions provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request did not finish within the configured timeout.
    #[error("provider request timed out")]
    Timeout,

    /// Connection, TLS, or I/O failure.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider error (status {status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// The response body was not a completion object.
    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
