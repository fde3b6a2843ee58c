//!
//! Chainpad: the backend of a browser code editor with a blockchain chat.
//! This library provides the chat interpreter, the upstream aggregator that
//! answers it, the file store, and the HTTP server tying them together.
//!
//! ## Core Concepts
//!
//! * **Intents (`intent::Intent`)**: The typed reading of one line of chat
//!   input, gated by the active `FeatureMode`.
//! * **Chat sessions (`chat::ChatSession`)**: Client-side conversation state.
//!   A session classifies input locally and reaches the backend through a
//!   `chat::ChatApi`.
//! * **Aggregator (`aggregator::Aggregator`)**: Server-side resolution of
//!   block and price lookups against the upstream block explorer and price
//!   service (`upstream::BlockSource`, `upstream::PriceSource`).
//! * **Store (`store::Store`)**: Users, editor files, and recently opened
//!   files. `store::InMemoryStore` is the only implementation.
//! * **Server (`server::router`)**: The axum routes exposing all of the above
//!   as JSON.

pub mod aggregator;
pub mod chat;
pub mod clock;
pub mod config;
pub mod identity;
pub mod intent;
pub mod server;
pub mod store;
pub mod upstream;

pub use aggregator::Aggregator;
pub use clock::{Clock, SystemClock};
pub use config::UpstreamConfig;
pub use intent::{BlockOffset, FeatureMode, Intent};

#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;

/// Result type used throughout the chainpad library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the chainpad library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured errors from the upstream HTTP clients
    #[error(transparent)]
    Upstream(upstream::UpstreamError),

    /// Structured errors from block and price resolution
    #[error(transparent)]
    Aggregate(aggregator::AggregateError),

    /// Structured errors from the store module
    #[error(transparent)]
    Store(store::StoreError),

    /// Structured errors from the chat client
    #[error(transparent)]
    Chat(chat::ChatError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Upstream(_) => "upstream",
            Error::Aggregate(_) => "aggregator",
            Error::Store(_) => "store",
            Error::Chat(_) => "chat",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Aggregate(aggregate_err) => aggregate_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Chat(chat_err) => chat_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is caused by bad caller input.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Aggregate(aggregate_err) => aggregate_err.is_validation(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if this error came from an upstream service.
    pub fn is_upstream_error(&self) -> bool {
        match self {
            Error::Upstream(_) => true,
            Error::Aggregate(aggregate_err) => {
                matches!(aggregate_err, aggregator::AggregateError::LatestBlockUnavailable { .. })
            }
            _ => false,
        }
    }

    /// Check if this error indicates a timeout.
    pub fn is_timeout_error(&self) -> bool {
        match self {
            Error::Upstream(upstream_err) => upstream_err.is_timeout(),
            Error::Chat(chat_err) => matches!(chat_err, chat::ChatError::Timeout { .. }),
            _ => false,
        }
    }
}
