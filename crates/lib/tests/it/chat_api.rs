use serde_json::json;

use super::helpers::{BLOCK_HASH, FIXED_TIMESTAMP, TestApp};

#[tokio::test]
async fn test_block_zero_returns_latest_without_head_lookup() {
    let app = TestApp::start().await;

    for command in ["block 0", "block +0", "block -0"] {
        let (status, body) = app
            .post_json("/api/chat/blockchain", json!({ "command": command }))
            .await;

        assert_eq!(status, 200);
        assert_eq!(body["command"], command);
        assert_eq!(body["blockNumber"], "最新ブロック");
        assert_eq!(body["blockInfo"]["hash"], BLOCK_HASH);
        assert_eq!(body["timestamp"], FIXED_TIMESTAMP);
    }

    assert_eq!(app.upstream.head_calls(), 0);
    assert_eq!(app.upstream.block_tags(), ["latest", "latest", "latest"]);
}

#[tokio::test]
async fn test_relative_block_is_resolved_against_head() {
    let app = TestApp::start().await;
    app.upstream.set_latest(Some(0x64));

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block -5" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["blockNumber"], "0x5f");
    assert_eq!(body["blockInfo"]["number"], "0x5f");

    let (_, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "Show me BLOCK + 28" }))
        .await;
    assert_eq!(body["blockNumber"], "0x80");

    assert_eq!(app.upstream.head_calls(), 2);
    assert_eq!(app.upstream.block_tags(), ["0x5f", "0x80"]);
}

#[tokio::test]
async fn test_unsigned_offset_queries_latest() {
    let app = TestApp::start().await;

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block 7" }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["blockNumber"], "最新ブロック");
    assert_eq!(app.upstream.head_calls(), 0);
}

#[tokio::test]
async fn test_missing_command_is_rejected() {
    let app = TestApp::start().await;

    for body in [json!({}), json!({ "command": "" }), json!({ "command": null })] {
        let (status, body) = app.post_json("/api/chat/blockchain", body).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "message": "Command is required" }));
    }

    // No body at all
    let response = app
        .client
        .post(app.url("/api/chat/blockchain"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Command is required");

    assert_eq!(app.upstream.total_calls(), 0);
}

#[tokio::test]
async fn test_head_failure_is_reported() {
    let app = TestApp::start().await;
    app.upstream.set_latest(None);

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block -1" }))
        .await;

    assert_eq!(status, 500);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Latest block number unavailable"), "{message}");
    assert!(app.upstream.block_tags().is_empty());
}

#[tokio::test]
async fn test_offset_before_genesis_is_bad_request() {
    let app = TestApp::start().await;
    app.upstream.set_latest(Some(3));

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block -4" }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        "Block offset -4 is out of range for latest block 3"
    );
}

#[tokio::test]
async fn test_missing_block_has_null_info() {
    let app = TestApp::start().await;
    app.upstream.set_blocks_missing(true);

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block +1" }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["blockNumber"], "0x65");
    assert!(body["blockInfo"].is_null());
}

#[tokio::test]
async fn test_price_for_icp_uses_alias() {
    let app = TestApp::start().await;
    app.upstream.set_price("internet-computer", 1234.5);

    for currency in ["icp", "ICP"] {
        let (status, body) = app
            .get_json(&format!("/api/chat/price?currency={currency}"))
            .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({ "currency": "ICP", "price": 1234.5, "timestamp": FIXED_TIMESTAMP })
        );
    }

    assert_eq!(
        app.upstream.price_slugs(),
        ["internet-computer", "internet-computer"]
    );
}

#[tokio::test]
async fn test_unknown_currency_is_not_found() {
    let app = TestApp::start().await;

    let (status, body) = app.get_json("/api/chat/price?currency=dogecoin").await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({ "message": "Price data for dogecoin not found" }));
}

#[tokio::test]
async fn test_rate_limited_price_api_is_a_server_error() {
    let app = TestApp::start().await;
    app.upstream.set_price("bitcoin", 10_000_000.0);
    app.upstream.set_price_status(429);

    let (status, body) = app.get_json("/api/chat/price?currency=bitcoin").await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({ "message": "coingecko returned HTTP 429" }));
}

#[tokio::test]
async fn test_explorer_error_status_is_a_server_error() {
    let app = TestApp::start().await;
    app.upstream.set_explorer_status(503);

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block 0" }))
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "etherscan returned HTTP 503");

    let (status, body) = app
        .post_json("/api/chat/blockchain", json!({ "command": "block -1" }))
        .await;
    assert_eq!(status, 500);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Latest block number unavailable")
    );
}

#[tokio::test]
async fn test_price_requires_currency() {
    let app = TestApp::start().await;

    for path in ["/api/chat/price", "/api/chat/price?currency="] {
        let (status, body) = app.get_json(path).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "Currency is required");
    }
    assert_eq!(app.upstream.total_calls(), 0);
}

#[tokio::test]
async fn test_repeated_price_queries_are_fresh() {
    let app = TestApp::start().await;
    app.upstream.set_price("bitcoin", 10_000_000.0);

    let (_, first) = app.get_json("/api/chat/price?currency=bitcoin").await;
    app.clock.advance(2_000);
    let (_, second) = app.get_json("/api/chat/price?currency=bitcoin").await;

    assert_eq!(first["price"], second["price"]);
    assert_eq!(first["currency"], "BITCOIN");
    assert_eq!(first["timestamp"], FIXED_TIMESTAMP);
    assert_eq!(second["timestamp"], "2024-01-01T00:00:02.000Z");
    assert_eq!(app.upstream.price_slugs().len(), 2);
}

#[tokio::test]
async fn test_raw_block_is_passed_through() {
    let app = TestApp::start().await;

    let (status, body) = app.get_json("/api/blockchain/block/0x10").await;

    assert_eq!(status, 200);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["result"]["number"], "0x10");
    assert_eq!(app.upstream.block_tags(), ["0x10"]);
}

#[tokio::test]
async fn test_health_and_whoami() {
    let app = TestApp::start().await;

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (_, body) = app.get_json("/api/whoami").await;
    assert_eq!(body["principal"], "2vxsx-fae");

    let response = app
        .client
        .get(app.url("/api/whoami"))
        .bearer_auth("delegation-chain")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    let principal = body["principal"].as_str().unwrap();
    assert_eq!(principal.len(), 27);
    assert_ne!(principal, "2vxsx-fae");
}
