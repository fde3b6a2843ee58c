//! Clients for the third-party read-only APIs.
//!
//! The aggregator only sees the [`BlockSource`] and [`PriceSource`] traits;
//! [`EtherscanClient`] and [`CoinGeckoClient`] are the HTTP implementations.
//! Tests substitute their own sources or point the real clients at a local
//! fake server.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::config::UpstreamConfig;

pub mod coingecko;
pub mod errors;
pub mod etherscan;

pub use coingecko::CoinGeckoClient;
pub use errors::UpstreamError;
pub use etherscan::EtherscanClient;

/// Selector for the block-by-tag endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// The literal `latest` tag.
    Latest,
    /// A concrete block height, rendered as lowercase `0x` hex.
    Number(u64),
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Number(n) => write!(f, "{n:#x}"),
        }
    }
}

/// Outcome of a block-by-tag call that reached the upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockLookup {
    /// The upstream returned a block object.
    Found(Value),
    /// The upstream answered, but without a usable block (null result,
    /// error string, or a body that was not JSON).
    Empty,
}

impl BlockLookup {
    pub fn into_option(self) -> Option<Value> {
        match self {
            BlockLookup::Found(value) => Some(value),
            BlockLookup::Empty => None,
        }
    }
}

/// Read access to an EVM chain through a block explorer.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Height of the newest block.
    async fn latest_block_number(&self) -> Result<u64>;

    /// Full block data (with transactions) for a tag.
    async fn block_by_tag(&self, tag: BlockTag) -> Result<BlockLookup>;

    /// The unshaped upstream response for a caller-supplied tag.
    async fn raw_block(&self, tag: &str) -> Result<Value>;
}

/// Spot prices for currencies identified by upstream slug.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Price of `slug` in `fiat`, or `None` if the upstream has no entry.
    async fn simple_price(&self, slug: &str, fiat: &str) -> Result<Option<f64>>;
}

/// Builds the HTTP client shared by both upstream clients.
pub fn http_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| UpstreamError::from_reqwest("http client", e).into())
}

/// Parses a `0x`-prefixed hexadecimal quantity.
pub fn parse_hex_quantity(raw: &str) -> Option<u64> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
