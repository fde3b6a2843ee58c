//! Upstream API configuration.
//!
//! Key management is external: keys arrive through the binary's CLI/env
//! layer and are optional. A missing Etherscan key falls back to anonymous,
//! rate-limited access; a missing CoinGecko key just omits the header.

use std::time::Duration;

use url::Url;

use crate::Result;
use crate::upstream::UpstreamError;

/// Default Etherscan-compatible API endpoint.
pub const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io/api";

/// Default CoinGecko-compatible API root.
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Default fiat unit for price quotes.
pub const DEFAULT_FIAT: &str = "jpy";

/// Default per-call upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the third-party APIs.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Block explorer endpoint (`module=proxy` style API).
    pub etherscan_url: Url,
    /// Optional Etherscan API key, sent as the `apikey` query parameter.
    pub etherscan_api_key: Option<String>,
    /// Price API root; `/simple/price` is appended.
    pub coingecko_url: Url,
    /// Optional price API key, sent as a bearer token.
    pub coingecko_api_key: Option<String>,
    /// Fiat unit prices are quoted in.
    pub fiat: String,
    /// Timeout applied to every upstream call.
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Creates a configuration with the given endpoints and default settings.
    pub fn new(etherscan_url: &str, coingecko_url: &str) -> Result<Self> {
        Ok(Self {
            etherscan_url: parse_url(etherscan_url)?,
            etherscan_api_key: None,
            coingecko_url: parse_url(coingecko_url)?,
            coingecko_api_key: None,
            fiat: DEFAULT_FIAT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_etherscan_key(mut self, key: Option<String>) -> Self {
        self.etherscan_api_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_coingecko_key(mut self, key: Option<String>) -> Self {
        self.coingecko_api_key = key.filter(|k| !k.is_empty());
        self
    }

    /// Sets the fiat unit; stored lowercased as the price API expects.
    pub fn with_fiat(mut self, fiat: impl AsRef<str>) -> Self {
        self.fiat = fiat.as_ref().to_ascii_lowercase();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        // The defaults are compile-time constants that always parse.
        Self::new(DEFAULT_ETHERSCAN_URL, DEFAULT_COINGECKO_URL)
            .expect("default upstream URLs are valid")
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| {
        UpstreamError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
