//! WhiteBIT adapter against a mock server

#![cfg(feature = "cex")]

use ccxt_rust::exchanges::Whitebit;
use ccxt_rust::types::{OrderSide, Timeframe};
use ccxt_rust::utils::crypto::{base64_decode, hmac_sha512_hex};
use ccxt_rust::{ErrorKind, Exchange, ExchangeConfig, Params};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ExchangeConfig {
    ExchangeConfig::new()
        .with_credentials("wb-key", "wb-secret")
        .with_url_override(server.uri())
        .with_rate_limit_ms(1)
}

async fn mount_markets(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v4/public/assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/public/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "BTC_USDT",
            "stock": "BTC",
            "money": "USDT",
            "stockPrec": "6",
            "moneyPrec": "2",
            "makerFee": "0.1",
            "takerFee": "0.1",
            "minAmount": "0.0001",
            "type": "spot",
            "tradesEnabled": true
        }])))
        .mount(server)
        .await;
}

async fn mount_post(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_markets_use_percent_fees_and_digit_precision() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let markets = exchange.load_markets(false).await.unwrap();
    let btc = &markets["BTC/USDT"];
    assert_eq!(btc.id, "BTC_USDT");
    assert_eq!(btc.taker, Some(dec!(0.001)));
    assert_eq!(btc.precision.amount, Some(dec!(0.000001)));
    assert_eq!(btc.precision.price, Some(dec!(0.01)));
}

#[tokio::test]
async fn test_balance_request_is_signed_payload() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v4/trade-account/balance"))
        .and(header("X-TXC-APIKEY", "wb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "BTC": { "available": "0.5", "freeze": "0.1" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let balances = exchange.fetch_balance(&Params::new()).await.unwrap();
    let btc = balances.get("BTC").unwrap();
    assert_eq!(btc.free, Some(dec!(0.5)));
    assert_eq!(btc.total, Some(dec!(0.6)));

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.url.path() == "/api/v4/trade-account/balance")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["request"], "/api/v4/trade-account/balance");
    assert!(body["nonce"].as_str().is_some());

    let payload = post.headers.get("X-TXC-PAYLOAD").unwrap().to_str().unwrap();
    assert_eq!(base64_decode(payload).unwrap(), post.body);
    let signature = post.headers.get("X-TXC-SIGNATURE").unwrap().to_str().unwrap();
    assert_eq!(signature, hmac_sha512_hex("wb-secret", payload).unwrap());
}

#[tokio::test]
async fn test_limit_order_posts_precision_strings() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    mount_post(
        &server,
        "/api/v4/order/new",
        200,
        json!({
            "orderId": 4986126152u64,
            "clientOrderId": "",
            "market": "BTC_USDT",
            "side": "buy",
            "type": "limit",
            "timestamp": 1595792396.165973,
            "dealMoney": "0",
            "dealStock": "0",
            "amount": "0.01",
            "left": "0.01",
            "dealFee": "0",
            "price": "30000"
        }),
    )
    .await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let order = exchange
        .create_limit_order("BTC/USDT", OrderSide::Buy, dec!(0.0123456789), dec!(30000.004), &Params::new())
        .await
        .unwrap();
    assert_eq!(order.id, "4986126152");
    assert_eq!(order.symbol.as_deref(), Some("BTC/USDT"));
    assert_eq!(order.remaining, Some(dec!(0.01)));

    let requests = server.received_requests().await.unwrap();
    let post = requests.iter().find(|r| r.url.path() == "/api/v4/order/new").unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["market"], "BTC_USDT");
    assert_eq!(body["amount"], "0.012345");
    assert_eq!(body["price"], "30000");
    assert!(body["clientOrderId"].as_str().is_some_and(|id| id.starts_with("ccxt")));
}

#[tokio::test]
async fn test_validation_error_maps_to_insufficient_funds() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    mount_post(
        &server,
        "/api/v4/order/new",
        422,
        json!({
            "code": 0,
            "message": "Validation failed",
            "errors": { "amount": ["Not enough balance."] }
        }),
    )
    .await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let err = exchange
        .create_limit_order("BTC/USDT", OrderSide::Buy, dec!(1), dec!(30000), &Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_throttled_response_is_ddos_protection() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v4/trade-account/balance"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let err = exchange.fetch_balance(&Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DDoSProtection);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_private_call_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let exchange = Whitebit::new(ExchangeConfig::new().with_url_override(server.uri())).unwrap();

    let err = exchange.fetch_balance(&Params::new()).await.unwrap_err();
    assert!(err.is_auth_error());
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.method.as_str() == "GET"));
}

#[tokio::test]
async fn test_ohlcv_limit_keeps_most_recent_candles() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let rows: Vec<Value> = (1..=5i64)
        .map(|i| json!([1_700_000_000 + i * 60, "30000", "30010", "30020", "29990", "1.5", "45000"]))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/public/kline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "",
            "result": rows
        })))
        .mount(&server)
        .await;
    let exchange = Whitebit::new(config(&server)).unwrap();

    let candles = exchange
        .fetch_ohlcv("BTC/USDT", Timeframe::Minute1, None, Some(2), &Params::new())
        .await
        .unwrap();
    let times: Vec<i64> = candles.iter().map(|c| c.timestamp).collect();
    assert_eq!(times, vec![1_700_000_240_000, 1_700_000_300_000]);
    assert_eq!(candles[1].close, Some(dec!(30010)));
}
