use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use chainpad::{
    Aggregator, FixedClock, UpstreamConfig,
    server::{AppState, router},
    store::{InMemoryStore, Store},
    upstream::{CoinGeckoClient, EtherscanClient, http_client},
};

pub const BLOCK_HASH: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

/// Timestamp produced by a default `FixedClock`.
pub const FIXED_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

// ==========================
// FAKE UPSTREAM
// ==========================

/// What the fake upstream serves, and what it was asked.
#[derive(Debug, Default)]
pub struct UpstreamState {
    /// Chain head; `None` makes `eth_blockNumber` answer with an error body.
    pub latest: Option<u64>,
    /// When set, `eth_getBlockByNumber` answers `"result": null`.
    pub blocks_missing: bool,
    /// slug -> price in jpy
    pub prices: HashMap<String, f64>,
    /// When set, the block explorer answers every call with this status.
    pub explorer_status: Option<u16>,
    /// When set, the price API answers every call with this status.
    pub price_status: Option<u16>,
    pub head_calls: usize,
    pub block_tags: Vec<String>,
    pub price_slugs: Vec<String>,
    pub api_keys: Vec<Option<String>>,
    pub price_auth: Vec<Option<String>>,
}

/// Shared handle to a running fake upstream.
#[derive(Debug, Clone, Default)]
pub struct FakeUpstream {
    pub addr: Option<SocketAddr>,
    pub state: Arc<Mutex<UpstreamState>>,
}

impl FakeUpstream {
    /// Starts a fake serving both the block explorer (`/etherscan`) and the
    /// price API (`/coingecko/simple/price`).
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(UpstreamState {
            latest: Some(0x64),
            ..Default::default()
        }));
        let app = Router::new()
            .route("/etherscan", get(handle_etherscan))
            .route("/coingecko/simple/price", get(handle_simple_price))
            .with_state(state.clone());
        let addr = spawn(app).await;
        Self {
            addr: Some(addr),
            state,
        }
    }

    pub fn config(&self) -> UpstreamConfig {
        let addr = self.addr.expect("fake upstream not started");
        UpstreamConfig::new(
            &format!("http://{addr}/etherscan"),
            &format!("http://{addr}/coingecko"),
        )
        .unwrap()
    }

    pub fn set_latest(&self, latest: Option<u64>) {
        self.state.lock().unwrap().latest = latest;
    }

    pub fn set_blocks_missing(&self, missing: bool) {
        self.state.lock().unwrap().blocks_missing = missing;
    }

    pub fn set_price(&self, slug: &str, price: f64) {
        self.state
            .lock()
            .unwrap()
            .prices
            .insert(slug.to_string(), price);
    }

    pub fn set_explorer_status(&self, status: u16) {
        self.state.lock().unwrap().explorer_status = Some(status);
    }

    pub fn set_price_status(&self, status: u16) {
        self.state.lock().unwrap().price_status = Some(status);
    }

    pub fn head_calls(&self) -> usize {
        self.state.lock().unwrap().head_calls
    }

    pub fn block_tags(&self) -> Vec<String> {
        self.state.lock().unwrap().block_tags.clone()
    }

    pub fn price_slugs(&self) -> Vec<String> {
        self.state.lock().unwrap().price_slugs.clone()
    }

    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.head_calls + state.block_tags.len() + state.price_slugs.len()
    }
}

pub fn sample_block(number: &str) -> Value {
    json!({
        "number": number,
        "hash": BLOCK_HASH,
        "parentHash": BLOCK_HASH,
        "transactions": [{ "hash": "0x01" }, { "hash": "0x02" }],
        "gasUsed": "0x5208",
        "gasLimit": "0x1c9c380",
    })
}

async fn handle_etherscan(
    State(state): State<Arc<Mutex<UpstreamState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    state.api_keys.push(params.get("apikey").cloned());
    if let Some(status) = state.explorer_status {
        return error_status(status, "Service temporarily unavailable");
    }
    (StatusCode::OK, explorer_body(&mut state, &params))
}

fn explorer_body(state: &mut UpstreamState, params: &HashMap<String, String>) -> Json<Value> {
    match params.get("action").map(String::as_str) {
        Some("eth_blockNumber") => {
            state.head_calls += 1;
            match state.latest {
                Some(latest) => Json(json!({
                    "jsonrpc": "2.0",
                    "id": 83,
                    "result": format!("{latest:#x}"),
                })),
                None => Json(json!({
                    "status": "0",
                    "message": "NOTOK",
                    "result": "Max rate limit reached",
                })),
            }
        }
        Some("eth_getBlockByNumber") => {
            let tag = params.get("tag").cloned().unwrap_or_default();
            state.block_tags.push(tag.clone());
            if state.blocks_missing {
                return Json(json!({ "jsonrpc": "2.0", "id": 1, "result": null }));
            }
            let number = if tag == "latest" {
                format!("{:#x}", state.latest.unwrap_or(0))
            } else {
                tag
            };
            Json(json!({ "jsonrpc": "2.0", "id": 1, "result": sample_block(&number) }))
        }
        _ => Json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Error! Missing Or invalid Action name",
        })),
    }
}

async fn handle_simple_price(
    State(state): State<Arc<Mutex<UpstreamState>>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    let slug = params.get("ids").cloned().unwrap_or_default();
    let fiat = params.get("vs_currencies").cloned().unwrap_or_default();
    state.price_slugs.push(slug.clone());
    state.price_auth.push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    if let Some(status) = state.price_status {
        return error_status(status, "You've exceeded the Rate Limit");
    }

    let mut body = Map::new();
    if let Some(price) = state.prices.get(&slug)
        && fiat == "jpy"
    {
        let mut quotes = Map::new();
        quotes.insert(fiat, json!(price));
        body.insert(slug, Value::Object(quotes));
    }
    (StatusCode::OK, Json(Value::Object(body)))
}

/// Error body in the shape the real APIs use, under a non-2xx status.
fn error_status(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(status).unwrap();
    (
        status,
        Json(json!({
            "status": { "error_code": status.as_u16(), "error_message": message },
        })),
    )
}

// ==========================
// APPLICATION UNDER TEST
// ==========================

/// Serves `app` on an ephemeral local port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A running chainpad server wired to a fake upstream and a fixed clock.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub upstream: FakeUpstream,
    pub clock: Arc<FixedClock>,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with_store(InMemoryStore::new()).await
    }

    pub async fn with_demo_data() -> Self {
        Self::start_with_store(InMemoryStore::with_demo_data().unwrap()).await
    }

    pub async fn start_with_store(store: InMemoryStore) -> Self {
        let upstream = FakeUpstream::start().await;
        let config = upstream.config();
        let http = http_client(&config).unwrap();
        let clock = Arc::new(FixedClock::default());
        let store = Arc::new(store);

        let aggregator = Aggregator::new(
            Arc::new(EtherscanClient::new(http.clone(), &config)),
            Arc::new(CoinGeckoClient::new(http, &config)),
            clock.clone(),
            config.fiat.clone(),
        );
        let state = AppState::new(aggregator, store.clone() as Arc<dyn Store>, clock.clone());
        let addr = spawn(router(state)).await;

        Self {
            addr,
            client: reqwest::Client::new(),
            upstream,
            clock,
            store,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}
