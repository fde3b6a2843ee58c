//! Wire shapes returned by the chat endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label used as `blockNumber` when the newest block was requested.
pub const LATEST_BLOCK_LABEL: &str = "最新ブロック";

/// Response of `POST /api/chat/blockchain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReport {
    /// The command string as received.
    pub command: String,
    /// Hex tag that was queried, or [`LATEST_BLOCK_LABEL`].
    pub block_number: String,
    /// Raw upstream block object; `null` when the upstream had no usable block.
    pub block_info: Option<Value>,
    /// Capture time of the response (not the block time).
    pub timestamp: String,
}

/// Response of `GET /api/chat/price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Upper-cased currency as requested.
    pub currency: String,
    pub price: f64,
    /// Capture time of the response.
    pub timestamp: String,
}
