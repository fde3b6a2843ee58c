use std::time::Duration;

use axum::{Json, Router, routing::get};
use serde_json::json;

use chainpad::{
    Error, UpstreamConfig,
    upstream::{
        BlockLookup, BlockSource, BlockTag, CoinGeckoClient, EtherscanClient, PriceSource,
        UpstreamError, http_client,
    },
};

use super::helpers::{FakeUpstream, spawn};

fn clients(config: &UpstreamConfig) -> (EtherscanClient, CoinGeckoClient) {
    let http = http_client(config).unwrap();
    (
        EtherscanClient::new(http.clone(), config),
        CoinGeckoClient::new(http, config),
    )
}

#[tokio::test]
async fn test_etherscan_api_key_is_optional() {
    let upstream = FakeUpstream::start().await;

    let (anonymous, _) = clients(&upstream.config());
    assert_eq!(anonymous.latest_block_number().await.unwrap(), 0x64);

    let config = upstream
        .config()
        .with_etherscan_key(Some("KEY123".to_string()));
    let (keyed, _) = clients(&config);
    assert_eq!(keyed.latest_block_number().await.unwrap(), 0x64);

    let keys = upstream.state.lock().unwrap().api_keys.clone();
    assert_eq!(keys, [None, Some("KEY123".to_string())]);
}

#[tokio::test]
async fn test_etherscan_error_body_is_malformed_head() {
    let upstream = FakeUpstream::start().await;
    upstream.set_latest(None);
    let (etherscan, _) = clients(&upstream.config());

    let err = etherscan.latest_block_number().await.unwrap_err();

    assert_eq!(err.module(), "upstream");
    assert!(err.to_string().contains("Max rate limit reached"));
}

#[tokio::test]
async fn test_block_by_tag_outcomes() {
    let upstream = FakeUpstream::start().await;
    let (etherscan, _) = clients(&upstream.config());

    match etherscan.block_by_tag(BlockTag::Number(0x5f)).await.unwrap() {
        BlockLookup::Found(block) => assert_eq!(block["number"], "0x5f"),
        BlockLookup::Empty => panic!("expected a block"),
    }

    upstream.set_blocks_missing(true);
    let lookup = etherscan.block_by_tag(BlockTag::Latest).await.unwrap();
    assert!(lookup.into_option().is_none());

    assert_eq!(upstream.block_tags(), ["0x5f", "latest"]);
}

#[tokio::test]
async fn test_coingecko_bearer_token() {
    let upstream = FakeUpstream::start().await;
    upstream.set_price("ethereum", 400_000.0);

    let (_, anonymous) = clients(&upstream.config());
    assert_eq!(
        anonymous.simple_price("ethereum", "jpy").await.unwrap(),
        Some(400_000.0)
    );

    let config = upstream
        .config()
        .with_coingecko_key(Some("cg-key".to_string()));
    let (_, keyed) = clients(&config);
    assert_eq!(keyed.simple_price("ethereum", "usd").await.unwrap(), None);

    let auth = upstream.state.lock().unwrap().price_auth.clone();
    assert_eq!(auth, [None, Some("Bearer cg-key".to_string())]);
}

#[tokio::test]
async fn test_non_success_status_is_an_upstream_error() {
    let upstream = FakeUpstream::start().await;
    upstream.set_price("bitcoin", 10_000_000.0);
    upstream.set_price_status(429);
    upstream.set_explorer_status(502);
    let (etherscan, coingecko) = clients(&upstream.config());

    let err = coingecko.simple_price("bitcoin", "jpy").await.unwrap_err();
    assert!(err.is_upstream_error());
    assert!(matches!(
        err,
        Error::Upstream(UpstreamError::Status {
            service: "coingecko",
            status: 429
        })
    ));

    let err = etherscan.block_by_tag(BlockTag::Latest).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Upstream(UpstreamError::Status { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "result": "0x1" }))
        }),
    );
    let addr = spawn(app).await;

    let config = UpstreamConfig::new(&format!("http://{addr}/slow"), &format!("http://{addr}"))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let (etherscan, _) = clients(&config);

    let err = etherscan.latest_block_number().await.unwrap_err();
    assert!(err.is_timeout_error(), "{err}");
    assert!(err.is_upstream_error());
}
