//! Error types for the chat client's backend calls.

use thiserror::Error;

/// Errors from talking to the chainpad backend.
///
/// The interpreter never lets these escape to the user; they are turned
/// into failure messages in the chat log.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChatError {
    /// The backend could not be reached.
    #[error("Failed to reach {url}: {reason}")]
    Connection {
        /// Endpoint that was called
        url: String,
        /// Transport error text
        reason: String,
    },

    /// The call exceeded the client timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Endpoint that was called
        url: String,
    },

    /// The backend answered with an error status.
    #[error("Server returned {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// The `message` field of the error body, or the raw body
        message: String,
    },

    /// The response body did not decode.
    #[error("Failed to decode response from {url}: {reason}")]
    Decode {
        /// Endpoint that was called
        url: String,
        /// Decoder error text
        reason: String,
    },
}

impl ChatError {
    /// Check if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::Server { status: 404, .. })
    }
}

impl From<ChatError> for crate::Error {
    fn from(err: ChatError) -> Self {
        crate::Error::Chat(err)
    }
}
