//! [`ChatApi`] over HTTP against a running chainpad server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::errors::ChatError;
use super::interpreter::ChatApi;
use crate::Result;
use crate::aggregator::{BlockReport, PriceQuote};
use crate::upstream::UpstreamError;

/// Calls `/api/chat/blockchain` and `/api/chat/price` on `base_url`.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    http: Client,
    base_url: Url,
}

impl HttpChatApi {
    /// Creates a client for the server at `base_url` (for example
    /// `http://127.0.0.1:5000`). Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Connection {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    fn transport_error(url: &Url, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout {
                url: url.to_string(),
            }
        } else {
            ChatError::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(ChatError::Server {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|e| {
            ChatError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn block(&self, command: &str) -> Result<BlockReport> {
        let url = self.endpoint("/api/chat/blockchain");
        debug!(%url, command, "POST");
        let response = self
            .http
            .post(url.clone())
            .json(&json!({ "command": command }))
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;
        Self::decode(&url, response).await
    }

    async fn price(&self, currency: &str) -> Result<PriceQuote> {
        let mut url = self.endpoint("/api/chat/price");
        url.query_pairs_mut().append_pair("currency", currency);
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;
        Self::decode(&url, response).await
    }
}
