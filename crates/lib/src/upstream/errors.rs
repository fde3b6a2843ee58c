//! Error types for third-party API calls.

use thiserror::Error;

/// Errors raised while talking to the block explorer or the price API.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent or the connection failed.
    #[error("{service} request failed: {reason}")]
    Request {
        /// Which upstream was being called
        service: &'static str,
        /// Transport error text
        reason: String,
    },

    /// The request exceeded the configured timeout.
    #[error("{service} request timed out")]
    Timeout {
        /// Which upstream was being called
        service: &'static str,
    },

    /// The upstream answered with a non-success HTTP status.
    #[error("{service} returned HTTP {status}")]
    Status {
        /// Which upstream was being called
        service: &'static str,
        /// The HTTP status code
        status: u16,
    },

    /// The response body was not the JSON we expected.
    #[error("{service} returned malformed data: {reason}")]
    Malformed {
        /// Which upstream was being called
        service: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// A configured base URL could not be used.
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser error text
        reason: String,
    },
}

impl UpstreamError {
    /// Converts a reqwest error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout { service }
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                service,
                status: status.as_u16(),
            }
        } else {
            UpstreamError::Request {
                service,
                reason: err.to_string(),
            }
        }
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

impl From<UpstreamError> for crate::Error {
    fn from(err: UpstreamError) -> Self {
        crate::Error::Upstream(err)
    }
}
