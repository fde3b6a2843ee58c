//! CoinGecko-compatible price client.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{PriceSource, UpstreamError};
use crate::Result;
use crate::config::UpstreamConfig;

const SERVICE: &str = "coingecko";

/// HTTP client for the `/simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(http: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.coingecko_url.clone(),
            api_key: config.coingecko_api_key.clone(),
        }
    }

    fn simple_price_url(&self, slug: &str, fiat: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/simple/price", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut()
            .append_pair("ids", slug)
            .append_pair("vs_currencies", fiat);
        url
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn simple_price(&self, slug: &str, fiat: &str) -> Result<Option<f64>> {
        let url = self.simple_price_url(slug, fiat);
        debug!(%url, "Fetching price data");

        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;
        // slug -> (fiat -> price); anything else means "no entry"
        let body: Value = response.json().await.map_err(|e| UpstreamError::Malformed {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        Ok(body
            .get(slug)
            .and_then(|quotes| quotes.get(fiat))
            .and_then(Value::as_f64))
    }
}
