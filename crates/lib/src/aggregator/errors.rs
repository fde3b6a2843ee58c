//! Error types for the aggregation layer.

use thiserror::Error;

/// Errors that can occur while resolving or shaping chat lookups.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The chain head could not be fetched, so a relative offset has no base.
    #[error("Latest block number unavailable: {reason}")]
    LatestBlockUnavailable {
        /// Underlying upstream failure
        reason: String,
    },

    /// A relative offset points before genesis or past `u64::MAX`.
    #[error("Block offset {offset} is out of range for latest block {latest}")]
    OffsetOutOfRange {
        /// The requested offset, as typed (`+N` / `-N`)
        offset: String,
        /// The chain head the offset was applied to
        latest: u64,
    },

    /// The price API has no entry for the currency.
    #[error("Price data for {currency} not found")]
    PriceNotFound {
        /// The currency as queried, after aliasing
        currency: String,
    },
}

impl AggregateError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AggregateError::PriceNotFound { .. })
    }

    /// Check if this error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, AggregateError::OffsetOutOfRange { .. })
    }
}

impl From<AggregateError> for crate::Error {
    fn from(err: AggregateError) -> Self {
        crate::Error::Aggregate(err)
    }
}
