//! Etherscan-compatible block explorer client.
//!
//! Uses the `module=proxy` JSON-RPC passthrough:
//! `action=eth_blockNumber` for the chain head and
//! `action=eth_getBlockByNumber&tag=…&boolean=true` for block data.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{BlockLookup, BlockSource, BlockTag, UpstreamError, parse_hex_quantity};
use crate::Result;
use crate::config::UpstreamConfig;

const SERVICE: &str = "etherscan";

/// JSON-RPC proxy envelope. `result` is a hex string, a block object, null,
/// or an error message depending on the call and its outcome.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    #[serde(default)]
    result: Value,
}

/// HTTP client for an Etherscan-compatible API.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.etherscan_url.clone(),
            api_key: config.etherscan_api_key.clone(),
        }
    }

    fn proxy_url(&self, action: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("module", "proxy");
            query.append_pair("action", action);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }

    async fn fetch_text(&self, url: Url) -> Result<String> {
        debug!(url = %redact_api_key(&url), "Calling block explorer");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;
        Ok(text)
    }
}

#[async_trait]
impl BlockSource for EtherscanClient {
    async fn latest_block_number(&self) -> Result<u64> {
        let url = self.proxy_url("eth_blockNumber", &[]);
        let text = self.fetch_text(url).await?;
        let envelope: ProxyEnvelope =
            serde_json::from_str(&text).map_err(|e| UpstreamError::Malformed {
                service: SERVICE,
                reason: format!("block number response is not JSON: {e}"),
            })?;
        let number = envelope
            .result
            .as_str()
            .and_then(parse_hex_quantity)
            .ok_or_else(|| UpstreamError::Malformed {
                service: SERVICE,
                reason: format!("unexpected block number result: {}", envelope.result),
            })?;
        Ok(number)
    }

    async fn block_by_tag(&self, tag: BlockTag) -> Result<BlockLookup> {
        let tag = tag.to_string();
        let url = self.proxy_url("eth_getBlockByNumber", &[("tag", &tag), ("boolean", "true")]);
        let text = self.fetch_text(url).await?;
        Ok(interpret_block_body(&text))
    }

    async fn raw_block(&self, tag: &str) -> Result<Value> {
        let url = self.proxy_url("eth_getBlockByNumber", &[("tag", tag), ("boolean", "true")]);
        let text = self.fetch_text(url).await?;
        serde_json::from_str(&text).map_err(|e| {
            UpstreamError::Malformed {
                service: SERVICE,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Turns a block-by-tag body into a lookup outcome. Never fails.
fn interpret_block_body(text: &str) -> BlockLookup {
    match serde_json::from_str::<ProxyEnvelope>(text) {
        Ok(ProxyEnvelope {
            result: block @ Value::Object(_),
        }) => BlockLookup::Found(block),
        Ok(ProxyEnvelope { result }) => {
            if !result.is_null() {
                warn!(%result, "Block explorer returned no block");
            }
            BlockLookup::Empty
        }
        Err(e) => {
            warn!("Failed to parse block explorer response: {e}");
            BlockLookup::Empty
        }
    }
}

/// Replaces the `apikey` query value for safe logging.
pub fn redact_api_key(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "apikey") {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
