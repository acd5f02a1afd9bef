//! CCXT-Rust: Cryptocurrency Exchange Trading Library
//!
//! CCXT 통합 API를 Rust로 옮긴 거래소 어댑터 라이브러리.
//! Coinbase, WOO X, WhiteBIT REST API를 하나의 [`Exchange`] trait으로 노출한다.
//!
//! ```rust,ignore
//! use ccxt_rust::{Exchange, ExchangeConfig, Params};
//! use ccxt_rust::exchanges::cex::Whitebit;
//!
//! let exchange = Whitebit::new(ExchangeConfig::new())?;
//! let ticker = exchange.fetch_ticker("BTC/USDT", &Params::new()).await?;
//! ```

#[macro_use]
pub mod macros;

pub mod client;
pub mod crypto;
pub mod errors;
pub mod exchanges;
pub mod logging;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{ExchangeConfig, HttpClient, RateLimiter};
pub use errors::{CcxtError, CcxtResult, ErrorKind};
pub use logging::{init_logging, LogConfig};
pub use types::{Exchange, ExchangeId, Params};
