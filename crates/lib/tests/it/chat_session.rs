use std::time::Duration;

use chainpad::{
    FeatureMode,
    chat::{ChatApi, ChatSession, HttpChatApi, text},
};

use super::helpers::TestApp;

fn session_for(app: &TestApp) -> ChatSession<HttpChatApi> {
    let api = HttpChatApi::new(&app.base_url(), Duration::from_secs(5)).unwrap();
    ChatSession::new(api)
}

#[tokio::test]
async fn test_block_query_end_to_end() {
    let app = TestApp::start().await;
    let mut session = session_for(&app);

    let reply = session.submit("block -1").await.unwrap().clone();

    assert_eq!(app.upstream.block_tags(), ["0x63"]);
    assert!(reply.text.starts_with("ブロック 0x63 の情報:\n"));
    assert!(reply.text.contains("・トランザクション数: 2\n"));
    assert!(reply.text.contains("・ガス使用量: 21000\n"));
    let block = reply.block.unwrap();
    assert_eq!(block.block_number, "0x63");
    assert!(block.block_info.is_some());

    let texts: Vec<_> = session
        .log()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], text::GREETING);
    assert_eq!(texts[1], "block -1");
}

#[tokio::test]
async fn test_price_query_end_to_end() {
    let app = TestApp::start().await;
    app.upstream.set_price("internet-computer", 1234.5);
    app.upstream.set_price("bitcoin", 10_000_000.0);
    app.upstream.set_price("ethereum", 400_000.0);

    let mut session = session_for(&app);
    session.set_mode(FeatureMode::PriceChecker);
    let reply = session.submit("price icp").await.unwrap().text.clone();

    assert!(reply.starts_with("通貨 ICP の現在価格:\n・価格: ¥1234.50\n"));
    assert!(reply.contains("・取得時刻: 2024/01/01 09:00:00\n"));
    assert!(reply.contains("・Bitcoin (BTC): ¥10000000.00\n"));
    assert!(reply.ends_with("・Ethereum (ETH): ¥400000.00"));

    let mut slugs = app.upstream.price_slugs();
    slugs.sort();
    assert_eq!(slugs, ["bitcoin", "ethereum", "internet-computer"]);
}

#[tokio::test]
async fn test_missing_price_becomes_failure_message() {
    let app = TestApp::start().await;
    app.upstream.set_price("bitcoin", 10_000_000.0);
    app.upstream.set_price("ethereum", 400_000.0);

    let mut session = session_for(&app);
    session.set_mode(FeatureMode::PriceChecker);
    let reply = session.submit("price dogecoin").await.unwrap().text.clone();

    assert_eq!(reply, text::PRICE_FAILURE);
}

#[tokio::test]
async fn test_mode_mismatch_stays_local() {
    let app = TestApp::start().await;
    let mut session = session_for(&app);

    let reply = session.submit("price icp").await.unwrap().text.clone();
    assert_eq!(reply, text::mode_mismatch("block"));

    session.set_mode(FeatureMode::PriceChecker);
    let reply = session.submit("block 0").await.unwrap().text.clone();
    assert_eq!(reply, text::mode_mismatch("price"));

    assert_eq!(app.upstream.total_calls(), 0);
}

#[tokio::test]
async fn test_server_errors_surface_message() {
    let app = TestApp::start().await;
    let api = HttpChatApi::new(&app.base_url(), Duration::from_secs(5)).unwrap();

    let err = api.price("dogecoin").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Server returned 404: Price data for dogecoin not found"
    );
}

#[tokio::test]
async fn test_unreachable_server_becomes_failure_message() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpChatApi::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let mut session = ChatSession::new(api);

    let reply = session.submit("block 0").await.unwrap().text.clone();
    assert_eq!(reply, text::BLOCK_FAILURE);
}
