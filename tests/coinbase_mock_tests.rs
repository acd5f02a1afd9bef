//! Coinbase adapter against a mock server
//!
//! 마켓 적재 순서, 커서 페이지네이션, 서명 헤더, 오류 매핑을 확인한다.

#![cfg(feature = "cex")]

use ccxt_rust::exchanges::Coinbase;
use ccxt_rust::types::{OrderSide, OrderType};
use ccxt_rust::utils::crypto::hmac_sha256_hex;
use ccxt_rust::{ErrorKind, Exchange, ExchangeConfig, Params};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ExchangeConfig {
    ExchangeConfig::new()
        .with_credentials("cb-key", "cb-secret")
        .with_url_override(server.uri())
        .with_rate_limit_ms(1)
}

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// load_markets 가 부르는 v2 화폐 목록과 v3 상품 목록
async fn mount_markets(server: &MockServer) {
    mount_get(
        server,
        "/v2/currencies",
        json!({ "data": [{ "id": "USD", "name": "US Dollar", "min_size": "0.01" }] }),
    )
    .await;
    mount_get(
        server,
        "/v2/currencies/crypto",
        json!({ "data": [{ "code": "BTC", "name": "Bitcoin", "exponent": 8, "type": "crypto", "asset_id": "5b71fc48" }] }),
    )
    .await;
    mount_get(
        server,
        "/v2/exchange-rates",
        json!({ "data": { "currency": "USD", "rates": { "BTC": "0.00002" } } }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/products"))
        .and(query_param("product_type", "FUTURE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "product_id": "BIT-28JUN24-CDE",
                "base_currency_id": "",
                "quote_currency_id": "USD",
                "product_type": "FUTURE",
                "base_increment": "1",
                "price_increment": "5",
                "future_product_details": {
                    "contract_root_unit": "BTC",
                    "contract_size": "0.01",
                    "contract_expiry": "2024-06-28T15:00:00Z",
                    "contract_expiry_type": "EXPIRING"
                }
            }]
        })))
        .with_priority(1)
        .mount(server)
        .await;
    mount_get(
        server,
        "/api/v3/brokerage/products",
        json!({
            "products": [{
                "product_id": "BTC-USD",
                "base_currency_id": "BTC",
                "quote_currency_id": "USD",
                "product_type": "SPOT",
                "base_increment": "0.00000001",
                "quote_increment": "0.01",
                "base_min_size": "0.00000001",
                "trading_disabled": false
            }]
        }),
    )
    .await;
    mount_get(
        server,
        "/api/v3/brokerage/transaction_summary",
        json!({ "fee_tier": { "taker_fee_rate": "0.006", "maker_fee_rate": "0.004" } }),
    )
    .await;
}

fn fill(trade_id: &str) -> serde_json::Value {
    json!({
        "trade_id": trade_id,
        "order_id": "order-1",
        "trade_time": "2024-01-02T03:04:05Z",
        "price": "42000",
        "size": "0.01",
        "commission": "0.25",
        "product_id": "BTC-USD",
        "liquidity_indicator": "TAKER",
        "size_in_quote": false,
        "side": "BUY"
    })
}

#[tokio::test]
async fn test_markets_list_spot_before_futures() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let markets = exchange.fetch_markets(&Params::new()).await.unwrap();
    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].symbol, "BTC/USD");
    assert!(markets[0].spot);
    assert_eq!(markets[0].taker, Some(dec!(0.006)));
    assert_eq!(markets[1].symbol, "BTC/USD:USD-240628");
    assert!(markets[1].future);
}

#[tokio::test]
async fn test_load_markets_fills_currency_cache() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let markets = exchange.load_markets(false).await.unwrap();
    assert!(markets.contains_key("BTC/USD"));
    let btc = exchange.currency("BTC").unwrap();
    assert_eq!(btc.currency_type.as_deref(), Some("crypto"));
    assert_eq!(btc.precision, Some(dec!(0.00000001)));
    assert_eq!(exchange.currency("USD").unwrap().currency_type.as_deref(), Some("fiat"));
}

#[tokio::test]
async fn test_my_trades_follow_cursor_until_empty() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/orders/historical/fills"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fills": [fill("t-2")],
            "cursor": ""
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_get(
        &server,
        "/api/v3/brokerage/orders/historical/fills",
        json!({ "fills": [fill("t-1")], "cursor": "page-2" }),
    )
    .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let mut params = Params::new();
    params.insert("paginate".into(), json!(true));
    let trades = exchange
        .fetch_my_trades(Some("BTC/USD"), None, None, &params)
        .await
        .unwrap();
    let ids: Vec<_> = trades.iter().filter_map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec!["t-1", "t-2"]);
    assert_eq!(trades[0].cost, Some(dec!(420)));

    let single = exchange
        .fetch_my_trades(Some("BTC/USD"), None, None, &Params::new())
        .await
        .unwrap();
    assert_eq!(single.len(), 1);
}

#[tokio::test]
async fn test_private_request_carries_hmac_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/accounts"))
        .and(header("CB-ACCESS-KEY", "cb-key"))
        .and(header("CB-VERSION", "2018-05-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accounts": [{ "uuid": "u-1", "name": "BTC Wallet", "currency": "BTC", "type": "ACCOUNT_TYPE_CRYPTO" }],
            "has_next": false,
            "cursor": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let accounts = exchange.fetch_accounts(&Params::new()).await.unwrap();
    assert_eq!(accounts[0].id.as_deref(), Some("u-1"));
    assert_eq!(accounts[0].account_type.as_deref(), Some("wallet"));

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let timestamp = request.headers.get("CB-ACCESS-TIMESTAMP").unwrap().to_str().unwrap();
    let signature = request.headers.get("CB-ACCESS-SIGN").unwrap().to_str().unwrap();
    let expected =
        hmac_sha256_hex("cb-secret", &format!("{timestamp}GET/api/v3/brokerage/accounts")).unwrap();
    assert_eq!(signature, expected);
}

#[tokio::test]
async fn test_private_call_without_credentials_sends_nothing() {
    let server = MockServer::start().await;
    let exchange = Coinbase::new(ExchangeConfig::new().with_url_override(server.uri())).unwrap();

    let err = exchange.fetch_accounts(&Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationError);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vendor_error_codes_map_to_unified_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/brokerage/accounts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "PERMISSION_DENIED",
            "message": "Missing required scopes"
        })))
        .mount(&server)
        .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let err = exchange.fetch_accounts(&Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_rejected_order_maps_error_response() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "failure_reason": "UNKNOWN_FAILURE_REASON",
            "error_response": {
                "error": "INSUFFICIENT_FUND",
                "message": "Insufficient balance in source account"
            }
        })))
        .mount(&server)
        .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let err = exchange
        .create_limit_order("BTC/USD", OrderSide::Buy, dec!(0.01), dec!(30000), &Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    let message = err.to_string();
    assert!(message.contains("coinbase POST"));
    assert!(message.contains(&format!("{}/api/v3/brokerage/orders", server.uri())));
    assert!(message.contains("INSUFFICIENT_FUND"));
}

#[tokio::test]
async fn test_rejected_edit_carries_request_context() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders/edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{ "edit_failure_reason": "ORDER_NOT_FOUND" }]
        })))
        .mount(&server)
        .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let err = exchange
        .edit_order(
            "order-1",
            "BTC/USD",
            OrderType::Limit,
            OrderSide::Buy,
            Some(dec!(0.02)),
            Some(dec!(31000)),
            &Params::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExchangeError);
    let message = err.to_string();
    assert!(message.contains("coinbase POST"));
    assert!(message.contains(&format!("{}/api/v3/brokerage/orders/edit", server.uri())));
}

#[tokio::test]
async fn test_trades_limit_keeps_most_recent() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    let trades: Vec<serde_json::Value> = (1..=5)
        .rev()
        .map(|i| {
            json!({
                "trade_id": i.to_string(),
                "product_id": "BTC-USD",
                "price": "42000",
                "size": "0.01",
                "time": format!("2024-01-02T03:04:0{i}Z"),
                "side": "BUY"
            })
        })
        .collect();
    mount_get(
        &server,
        "/api/v3/brokerage/products/BTC-USD/ticker",
        json!({ "trades": trades, "best_bid": "41999", "best_ask": "42001" }),
    )
    .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let trades = exchange
        .fetch_trades("BTC/USD", None, Some(2), &Params::new())
        .await
        .unwrap();
    let ids: Vec<Option<&str>> = trades.iter().map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("4"), Some("5")]);
}

#[tokio::test]
async fn test_accepted_order_returns_id() {
    let server = MockServer::start().await;
    mount_markets(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v3/brokerage/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "success_response": {
                "order_id": "11111-00000-000000",
                "product_id": "BTC-USD",
                "side": "BUY",
                "client_order_id": "0000-00000-000000"
            }
        })))
        .mount(&server)
        .await;
    let exchange = Coinbase::new(config(&server)).unwrap();

    let order = exchange
        .create_limit_order("BTC/USD", OrderSide::Buy, dec!(0.01), dec!(30000), &Params::new())
        .await
        .unwrap();
    assert_eq!(order.id, "11111-00000-000000");
    assert_eq!(order.symbol.as_deref(), Some("BTC/USD"));
    assert_eq!(order.price, Some(dec!(30000)));

    let requests = server.received_requests().await.unwrap();
    let post = requests.iter().find(|r| r.url.path() == "/api/v3/brokerage/orders").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["order_configuration"]["limit_limit_gtc"]["limit_price"], "30000");
    assert_eq!(body["side"], "BUY");
    assert!(body["client_order_id"].as_str().is_some_and(|id| id.len() == 36));
}
