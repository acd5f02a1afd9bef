//! Integration tests for error handling
//!
//! 통합 오류 계층, 분류 헬퍼, 벤더 코드 테이블 매칭

#![cfg(feature = "cex")]

use ccxt_rust::errors::{ExceptionTable, RequestContext};
use ccxt_rust::{CcxtError, CcxtResult, ErrorKind};

// === Error Type Tests ===

#[test]
fn test_error_hierarchy_exchange_errors() {
    let errors = vec![
        CcxtError::ExchangeError {
            message: "Generic error".into(),
        },
        CcxtError::AuthenticationError {
            message: "Invalid API key".into(),
        },
        CcxtError::PermissionDenied {
            message: "Missing required scopes".into(),
        },
        CcxtError::AccountSuspended {
            message: "Account suspended".into(),
        },
        CcxtError::ArgumentsRequired {
            message: "Symbol required".into(),
        },
        CcxtError::BadRequest {
            message: "Invalid parameter".into(),
        },
        CcxtError::BadSymbol {
            message: "INVALID/PAIR".into(),
        },
        CcxtError::InsufficientFunds {
            message: "Not enough balance.".into(),
        },
        CcxtError::InvalidAddress {
            message: "bad address".into(),
        },
        CcxtError::NotSupported {
            feature: "fetchTickers".into(),
        },
    ];

    for err in errors {
        assert!(!err.code().is_empty());
        assert!(!err.is_retryable(), "Expected permanent error: {:?}", err);
        assert_eq!(err.suggested_retry_after(), None);
    }
}

#[test]
fn test_error_hierarchy_network_errors() {
    let retryable = vec![
        CcxtError::NetworkError {
            url: "https://api.woo.org/v1/orders".into(),
            message: "Connection reset".into(),
        },
        CcxtError::DDoSProtection {
            message: "whitebit 418".into(),
        },
        CcxtError::RateLimitExceeded {
            message: "Too many requests".into(),
            retry_after_ms: None,
        },
        CcxtError::ExchangeNotAvailable {
            message: "Service down".into(),
        },
        CcxtError::OnMaintenance {
            message: "Scheduled maintenance".into(),
        },
        CcxtError::InvalidNonce {
            message: "request timestamp expired".into(),
        },
        CcxtError::RequestTimeout {
            url: "https://api.coinbase.com/v2/time".into(),
        },
    ];

    for err in retryable {
        assert!(err.is_retryable(), "Expected retryable error: {:?}", err);
        assert!(err.is_network_error());
        assert!(err.suggested_retry_after().is_some());
        assert!(!err.is_auth_error());
    }
}

#[test]
fn test_error_hierarchy_order_errors() {
    let invalid = CcxtError::InvalidOrder {
        message: "price tick".into(),
    };
    let missing = CcxtError::OrderNotFound {
        message: "order with this orderID was not found".into(),
    };
    assert!(invalid.is_order_error());
    assert!(missing.is_order_error());
    assert!(!CcxtError::InsufficientFunds { message: String::new() }.is_order_error());
}

#[test]
fn test_auth_error_classification() {
    let auth_errors = vec![
        CcxtError::AuthenticationError { message: "".into() },
        CcxtError::PermissionDenied { message: "".into() },
        CcxtError::AccountSuspended { message: "".into() },
        CcxtError::InvalidPrivateKey { message: "".into() },
    ];
    for err in auth_errors {
        assert!(err.is_auth_error(), "Expected auth error: {:?}", err);
        assert!(!err.is_retryable());
    }
}

// === Kind Tests ===

#[test]
fn test_kind_round_trips_through_with_message() {
    let kinds = [
        ErrorKind::ExchangeError,
        ErrorKind::AuthenticationError,
        ErrorKind::PermissionDenied,
        ErrorKind::AccountSuspended,
        ErrorKind::ArgumentsRequired,
        ErrorKind::BadRequest,
        ErrorKind::BadSymbol,
        ErrorKind::InsufficientFunds,
        ErrorKind::InvalidAddress,
        ErrorKind::InvalidOrder,
        ErrorKind::OrderNotFound,
        ErrorKind::NotSupported,
        ErrorKind::NetworkError,
        ErrorKind::DDoSProtection,
        ErrorKind::RateLimitExceeded,
        ErrorKind::ExchangeNotAvailable,
        ErrorKind::OnMaintenance,
        ErrorKind::InvalidNonce,
        ErrorKind::RequestTimeout,
        ErrorKind::BadResponse,
    ];
    for kind in kinds {
        assert_eq!(kind.with_message("feedback").kind(), kind);
    }
}

#[test]
fn test_parse_failures_report_bad_response() {
    let parse = CcxtError::ParseError {
        data_type: "Order".into(),
        message: "missing id".into(),
    };
    assert_eq!(parse.kind(), ErrorKind::BadResponse);
    assert_eq!(parse.code(), "PARSE_ERROR");

    let key = CcxtError::InvalidPrivateKey {
        message: "not a PEM".into(),
    };
    assert_eq!(key.kind(), ErrorKind::AuthenticationError);
}

#[test]
fn test_suggested_retry_delays() {
    let with_hint = CcxtError::RateLimitExceeded {
        message: "slow down".into(),
        retry_after_ms: Some(2500),
    };
    assert_eq!(with_hint.suggested_retry_after(), Some(2500));
    assert_eq!(
        ErrorKind::RateLimitExceeded.with_message("x").suggested_retry_after(),
        Some(1000)
    );
    assert_eq!(
        CcxtError::OnMaintenance { message: "".into() }.suggested_retry_after(),
        Some(60000)
    );
}

// === Exception Table Tests ===

fn venue_table() -> ExceptionTable {
    ExceptionTable::new()
        .exact("INSUFFICIENT_FUND", ErrorKind::BadRequest)
        .exact("-1003", ErrorKind::RateLimitExceeded)
        .exact("Not enough balance.", ErrorKind::InsufficientFunds)
        .broad("request timestamp expired", ErrorKind::InvalidNonce)
        .broad("Given amount is less than min amount", ErrorKind::InvalidOrder)
}

#[test]
fn test_exact_code_beats_broad_message() {
    let err = venue_table().resolve(
        Some("INSUFFICIENT_FUND"),
        Some("request timestamp expired"),
        "coinbase POST /api/v3/brokerage/orders",
    );
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(err.to_string().contains("coinbase POST"));
}

#[test]
fn test_broad_message_matches_substring() {
    let err = venue_table().resolve(
        None,
        Some("Given amount is less than min amount 200000"),
        "whitebit",
    );
    assert_eq!(err.kind(), ErrorKind::InvalidOrder);
}

#[test]
fn test_throw_helpers_propagate_with_question_mark() {
    fn check(table: &ExceptionTable, code: &str, body: &str) -> CcxtResult<()> {
        table.throw_exactly_matched(Some(code), body)?;
        table.throw_broadly_matched(Some(body), body)?;
        Ok(())
    }

    let table = venue_table();
    let err = check(&table, "-1003", r#"{"code":-1003}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert!(check(&table, "-9999", r#"{"code":-9999}"#).is_ok());
}

#[test]
fn test_request_context_feedback() {
    let context = RequestContext::new("woo", "GET", "https://api.woo.org/v1/orders");
    assert_eq!(context.feedback("{}"), "woo GET https://api.woo.org/v1/orders {}");
}

// === From Trait Tests ===

#[test]
fn test_from_json_error() {
    let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
    let err: CcxtError = result.unwrap_err().into();
    assert_eq!(err.code(), "JSON_ERROR");
    assert_eq!(err.kind(), ErrorKind::BadResponse);
}

#[test]
fn test_error_display_messages() {
    let err = CcxtError::AuthenticationError {
        message: "coinbase requires apiKey and secret".into(),
    };
    assert!(err.to_string().contains("apiKey"));

    let err = CcxtError::not_supported("fetchTickers");
    assert_eq!(err.to_string(), "Not supported: fetchTickers");

    let err = CcxtError::arguments_required("whitebit cancelOrder() requires a symbol argument");
    assert_eq!(err.kind(), ErrorKind::ArgumentsRequired);
}
