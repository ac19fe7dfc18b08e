//! Transport layer error types.

use crate::error::{GenJobError, NetworkError, TimeoutError};

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the server or the exchange broke off.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The transport gave up waiting.
    #[error("Timeout")]
    Timeout,
    /// The response could not be read.
    #[error("Request error: {0}")]
    Request(String),
}

impl From<TransportError> for GenJobError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) => {
                GenJobError::Network(NetworkError::ConnectionFailed { message })
            }
            TransportError::Timeout => GenJobError::Timeout(TimeoutError::Transport),
            TransportError::Request(message) => {
                GenJobError::Network(NetworkError::RequestFailed { message })
            }
        }
    }
}
