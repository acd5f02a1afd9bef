//! CCXT Error Hierarchy
//!
//! 거래소 오류 분류 체계와 벤더 오류 코드 매핑 테이블

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// CCXT error hierarchy
///
/// - ExchangeError
///   - AuthenticationError
///     - PermissionDenied
///     - AccountSuspended
///   - ArgumentsRequired
///   - BadRequest
///     - BadSymbol
///   - InsufficientFunds
///   - InvalidAddress
///   - InvalidOrder
///     - OrderNotFound
///   - NotSupported
/// - NetworkError
///   - DDoSProtection
///   - RateLimitExceeded
///   - ExchangeNotAvailable
///     - OnMaintenance
///   - InvalidNonce
///   - RequestTimeout
///   - BadResponse
#[derive(Error, Debug)]
pub enum CcxtError {
    // === ExchangeError family ===
    /// Generic exchange error
    #[error("Exchange error: {message}")]
    ExchangeError { message: String },

    /// Authentication failed (invalid API key, signature, missing credentials)
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    /// API key lacks permission for the operation
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Account is suspended or not verified
    #[error("Account suspended: {message}")]
    AccountSuspended { message: String },

    /// Required arguments missing
    #[error("Arguments required: {message}")]
    ArgumentsRequired { message: String },

    /// Invalid request parameters
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Unknown or delisted trading symbol
    #[error("Bad symbol: {message}")]
    BadSymbol { message: String },

    /// Not enough balance
    #[error("Insufficient funds: {message}")]
    InsufficientFunds { message: String },

    /// Invalid deposit/withdrawal address
    #[error("Invalid address: {message}")]
    InvalidAddress { message: String },

    /// Generic invalid order error
    #[error("Invalid order: {message}")]
    InvalidOrder { message: String },

    /// Order not found on exchange
    #[error("Order not found: {message}")]
    OrderNotFound { message: String },

    /// Feature not supported by this exchange
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    // === NetworkError family ===
    /// Generic network error
    #[error("Network error: {url} - {message}")]
    NetworkError { url: String, message: String },

    /// CloudFlare or similar DDoS protection triggered
    #[error("DDoS protection triggered: {message}")]
    DDoSProtection { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        /// Suggested retry after in milliseconds (if provided by exchange)
        retry_after_ms: Option<u64>,
    },

    /// Exchange is temporarily unavailable
    #[error("Exchange not available: {message}")]
    ExchangeNotAvailable { message: String },

    /// Exchange is under maintenance
    #[error("On maintenance: {message}")]
    OnMaintenance { message: String },

    /// Invalid nonce (request timestamp/counter issue)
    #[error("Invalid nonce: {message}")]
    InvalidNonce { message: String },

    /// Request timed out
    #[error("Request timeout: {url}")]
    RequestTimeout { url: String },

    /// Malformed or empty response where a success envelope was expected
    #[error("Bad response: {message}")]
    BadResponse { message: String },

    // === Parsing errors ===
    /// Failed to parse response data
    #[error("Parse error: {data_type} - {message}")]
    ParseError { data_type: String, message: String },

    /// JSON parsing error
    #[error("JSON error: {message}")]
    JsonError { message: String },

    // === Cryptographic errors ===
    /// Invalid private key
    #[error("Invalid private key: {message}")]
    InvalidPrivateKey { message: String },
}

/// 오류 종류 태그
///
/// 예외 테이블이 벤더 코드를 매핑하는 대상. 메시지는 매핑 시점에 붙는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ExchangeError,
    AuthenticationError,
    PermissionDenied,
    AccountSuspended,
    ArgumentsRequired,
    BadRequest,
    BadSymbol,
    InsufficientFunds,
    InvalidAddress,
    InvalidOrder,
    OrderNotFound,
    NotSupported,
    NetworkError,
    DDoSProtection,
    RateLimitExceeded,
    ExchangeNotAvailable,
    OnMaintenance,
    InvalidNonce,
    RequestTimeout,
    BadResponse,
}

impl ErrorKind {
    /// 메시지를 붙여 구체적인 오류로 변환
    pub fn with_message(self, message: impl Into<String>) -> CcxtError {
        let message = message.into();
        match self {
            ErrorKind::ExchangeError => CcxtError::ExchangeError { message },
            ErrorKind::AuthenticationError => CcxtError::AuthenticationError { message },
            ErrorKind::PermissionDenied => CcxtError::PermissionDenied { message },
            ErrorKind::AccountSuspended => CcxtError::AccountSuspended { message },
            ErrorKind::ArgumentsRequired => CcxtError::ArgumentsRequired { message },
            ErrorKind::BadRequest => CcxtError::BadRequest { message },
            ErrorKind::BadSymbol => CcxtError::BadSymbol { message },
            ErrorKind::InsufficientFunds => CcxtError::InsufficientFunds { message },
            ErrorKind::InvalidAddress => CcxtError::InvalidAddress { message },
            ErrorKind::InvalidOrder => CcxtError::InvalidOrder { message },
            ErrorKind::OrderNotFound => CcxtError::OrderNotFound { message },
            ErrorKind::NotSupported => CcxtError::NotSupported { feature: message },
            ErrorKind::NetworkError => CcxtError::NetworkError {
                url: String::new(),
                message,
            },
            ErrorKind::DDoSProtection => CcxtError::DDoSProtection { message },
            ErrorKind::RateLimitExceeded => CcxtError::RateLimitExceeded {
                message,
                retry_after_ms: None,
            },
            ErrorKind::ExchangeNotAvailable => CcxtError::ExchangeNotAvailable { message },
            ErrorKind::OnMaintenance => CcxtError::OnMaintenance { message },
            ErrorKind::InvalidNonce => CcxtError::InvalidNonce { message },
            ErrorKind::RequestTimeout => CcxtError::RequestTimeout { url: message },
            ErrorKind::BadResponse => CcxtError::BadResponse { message },
        }
    }
}

impl CcxtError {
    /// 오류 종류 태그
    pub fn kind(&self) -> ErrorKind {
        match self {
            CcxtError::ExchangeError { .. } => ErrorKind::ExchangeError,
            CcxtError::AuthenticationError { .. } | CcxtError::InvalidPrivateKey { .. } => {
                ErrorKind::AuthenticationError
            },
            CcxtError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            CcxtError::AccountSuspended { .. } => ErrorKind::AccountSuspended,
            CcxtError::ArgumentsRequired { .. } => ErrorKind::ArgumentsRequired,
            CcxtError::BadRequest { .. } => ErrorKind::BadRequest,
            CcxtError::BadSymbol { .. } => ErrorKind::BadSymbol,
            CcxtError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            CcxtError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            CcxtError::InvalidOrder { .. } => ErrorKind::InvalidOrder,
            CcxtError::OrderNotFound { .. } => ErrorKind::OrderNotFound,
            CcxtError::NotSupported { .. } => ErrorKind::NotSupported,
            CcxtError::NetworkError { .. } => ErrorKind::NetworkError,
            CcxtError::DDoSProtection { .. } => ErrorKind::DDoSProtection,
            CcxtError::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            CcxtError::ExchangeNotAvailable { .. } => ErrorKind::ExchangeNotAvailable,
            CcxtError::OnMaintenance { .. } => ErrorKind::OnMaintenance,
            CcxtError::InvalidNonce { .. } => ErrorKind::InvalidNonce,
            CcxtError::RequestTimeout { .. } => ErrorKind::RequestTimeout,
            CcxtError::BadResponse { .. }
            | CcxtError::ParseError { .. }
            | CcxtError::JsonError { .. } => ErrorKind::BadResponse,
        }
    }

    /// Returns the error code as a string constant
    pub fn code(&self) -> &'static str {
        match self {
            CcxtError::ExchangeError { .. } => "EXCHANGE_ERROR",
            CcxtError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            CcxtError::PermissionDenied { .. } => "PERMISSION_DENIED",
            CcxtError::AccountSuspended { .. } => "ACCOUNT_SUSPENDED",
            CcxtError::ArgumentsRequired { .. } => "ARGUMENTS_REQUIRED",
            CcxtError::BadRequest { .. } => "BAD_REQUEST",
            CcxtError::BadSymbol { .. } => "BAD_SYMBOL",
            CcxtError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            CcxtError::InvalidAddress { .. } => "INVALID_ADDRESS",
            CcxtError::InvalidOrder { .. } => "INVALID_ORDER",
            CcxtError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            CcxtError::NotSupported { .. } => "NOT_SUPPORTED",
            CcxtError::NetworkError { .. } => "NETWORK_ERROR",
            CcxtError::DDoSProtection { .. } => "DDOS_PROTECTION",
            CcxtError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            CcxtError::ExchangeNotAvailable { .. } => "EXCHANGE_NOT_AVAILABLE",
            CcxtError::OnMaintenance { .. } => "ON_MAINTENANCE",
            CcxtError::InvalidNonce { .. } => "INVALID_NONCE",
            CcxtError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            CcxtError::BadResponse { .. } => "BAD_RESPONSE",
            CcxtError::ParseError { .. } => "PARSE_ERROR",
            CcxtError::JsonError { .. } => "JSON_ERROR",
            CcxtError::InvalidPrivateKey { .. } => "INVALID_PRIVATE_KEY",
        }
    }

    /// Returns true if this error is temporary and the operation can be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CcxtError::NetworkError { .. }
                | CcxtError::RequestTimeout { .. }
                | CcxtError::RateLimitExceeded { .. }
                | CcxtError::DDoSProtection { .. }
                | CcxtError::ExchangeNotAvailable { .. }
                | CcxtError::OnMaintenance { .. }
                | CcxtError::InvalidNonce { .. }
        )
    }

    /// Returns true if this is an authentication-related error
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CcxtError::AuthenticationError { .. }
                | CcxtError::PermissionDenied { .. }
                | CcxtError::AccountSuspended { .. }
                | CcxtError::InvalidPrivateKey { .. }
        )
    }

    /// Returns true if this is an order-related error
    pub fn is_order_error(&self) -> bool {
        matches!(
            self,
            CcxtError::InvalidOrder { .. } | CcxtError::OrderNotFound { .. }
        )
    }

    /// Returns true if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        self.is_retryable()
    }

    /// Returns the suggested retry delay in milliseconds for retryable errors
    pub fn suggested_retry_after(&self) -> Option<u64> {
        match self {
            CcxtError::RateLimitExceeded { retry_after_ms, .. } => retry_after_ms.or(Some(1000)),
            CcxtError::RequestTimeout { .. } => Some(5000),
            CcxtError::ExchangeNotAvailable { .. } => Some(30000),
            CcxtError::OnMaintenance { .. } => Some(60000),
            CcxtError::NetworkError { .. } => Some(1000),
            CcxtError::InvalidNonce { .. } => Some(100),
            CcxtError::DDoSProtection { .. } => Some(60000),
            _ => None,
        }
    }

    /// `NotSupported` 단축 생성
    pub fn not_supported(feature: impl Into<String>) -> Self {
        CcxtError::NotSupported {
            feature: feature.into(),
        }
    }

    /// `ArgumentsRequired` 단축 생성
    pub fn arguments_required(message: impl Into<String>) -> Self {
        CcxtError::ArgumentsRequired {
            message: message.into(),
        }
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for CcxtError {
    fn from(err: serde_json::Error) -> Self {
        CcxtError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CcxtError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            CcxtError::RequestTimeout { url }
        } else if err.is_connect() {
            CcxtError::NetworkError {
                url,
                message: "Connection failed".into(),
            }
        } else {
            CcxtError::NetworkError {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// Result 타입 alias
pub type CcxtResult<T> = Result<T, CcxtError>;

/// 요청 문맥
///
/// 매핑된 오류 메시지에 거래소 id와 요청 정보를 남긴다.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub exchange: String,
    pub method: String,
    pub url: String,
}

impl RequestContext {
    pub fn new(
        exchange: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            method: method.into(),
            url: url.into(),
        }
    }

    /// `"<id> <METHOD> <url> <body>"` 형태의 진단 문자열
    pub fn feedback(&self, body: &str) -> String {
        format!("{} {} {} {}", self.exchange, self.method, self.url, body)
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.exchange, self.method, self.url)
    }
}

/// 벤더 오류 코드/메시지 → 오류 종류 테이블
///
/// exact는 코드 전체가 일치해야 하고, broad는 메시지에 부분 문자열로 포함되면
/// 선언 순서상 첫 항목이 이긴다.
#[derive(Debug, Clone, Default)]
pub struct ExceptionTable {
    exact: HashMap<String, ErrorKind>,
    broad: Vec<(String, ErrorKind)>,
}

impl ExceptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(mut self, key: impl Into<String>, kind: ErrorKind) -> Self {
        self.exact.insert(key.into(), kind);
        self
    }

    pub fn broad(mut self, needle: impl Into<String>, kind: ErrorKind) -> Self {
        self.broad.push((needle.into(), kind));
        self
    }

    pub fn match_exact(&self, key: &str) -> Option<ErrorKind> {
        self.exact.get(key).copied()
    }

    pub fn match_broad(&self, text: &str) -> Option<ErrorKind> {
        self.broad
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, kind)| *kind)
    }

    /// exact 테이블에 걸리면 Err
    pub fn throw_exactly_matched(&self, key: Option<&str>, feedback: &str) -> CcxtResult<()> {
        match key.and_then(|k| self.match_exact(k)) {
            Some(kind) => Err(kind.with_message(feedback)),
            None => Ok(()),
        }
    }

    /// broad 테이블에 걸리면 Err
    pub fn throw_broadly_matched(&self, text: Option<&str>, feedback: &str) -> CcxtResult<()> {
        match text.and_then(|t| self.match_broad(t)) {
            Some(kind) => Err(kind.with_message(feedback)),
            None => Ok(()),
        }
    }

    /// exact → broad → ExchangeError 순으로 오류 결정
    pub fn resolve(&self, code: Option<&str>, message: Option<&str>, feedback: &str) -> CcxtError {
        code.and_then(|c| self.match_exact(c))
            .or_else(|| message.and_then(|m| self.match_broad(m)))
            .unwrap_or(ErrorKind::ExchangeError)
            .with_message(feedback)
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.broad.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExceptionTable {
        ExceptionTable::new()
            .exact("rate_limit_exceeded", ErrorKind::RateLimitExceeded)
            .exact("not_found", ErrorKind::OrderNotFound)
            .broad("Insufficient", ErrorKind::InsufficientFunds)
            .broad("Insufficient balance", ErrorKind::BadRequest)
    }

    #[test]
    fn test_error_codes() {
        let err = CcxtError::AuthenticationError {
            message: "Invalid API key".into(),
        };
        assert_eq!(err.code(), "AUTHENTICATION_ERROR");
        assert_eq!(err.kind(), ErrorKind::AuthenticationError);
    }

    #[test]
    fn test_exact_match_wins_over_broad() {
        let err = table().resolve(
            Some("rate_limit_exceeded"),
            Some("Insufficient balance"),
            "coinbase GET /v2/accounts {}",
        );
        assert!(matches!(err, CcxtError::RateLimitExceeded { .. }));
    }

    #[test]
    fn test_broad_match_first_declared_wins() {
        let err = table().resolve(None, Some("Insufficient balance in account"), "feedback");
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    }

    #[test]
    fn test_unmatched_falls_back_to_exchange_error() {
        let err = table().resolve(Some("mystery"), Some("nothing known"), "woo GET /v1/x {}");
        match err {
            CcxtError::ExchangeError { message } => assert!(message.starts_with("woo GET")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_throw_helpers_pass_through_when_unmatched() {
        let t = table();
        assert!(t.throw_exactly_matched(Some("other"), "fb").is_ok());
        assert!(t.throw_exactly_matched(None, "fb").is_ok());
        assert!(t.throw_broadly_matched(Some("all good"), "fb").is_ok());
        assert!(t.throw_broadly_matched(Some("Insufficient"), "fb").is_err());
    }

    #[test]
    fn test_feedback_carries_request_context() {
        let ctx = RequestContext::new("whitebit", "POST", "https://whitebit.com/api/v4/orders");
        let fb = ctx.feedback("{\"code\":10}");
        assert_eq!(
            fb,
            "whitebit POST https://whitebit.com/api/v4/orders {\"code\":10}"
        );
    }

    #[test]
    fn test_retryable_errors() {
        let timeout_err = CcxtError::RequestTimeout {
            url: "https://api.example.com".into(),
        };
        assert!(timeout_err.is_retryable());
        assert_eq!(timeout_err.suggested_retry_after(), Some(5000));

        let auth_err = CcxtError::AuthenticationError {
            message: "Invalid key".into(),
        };
        assert!(!auth_err.is_retryable());
        assert!(auth_err.is_auth_error());
    }
}
