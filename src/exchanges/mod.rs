//! Exchange Implementations
//!
//! 거래소별 구현체

#[cfg(feature = "cex")]
pub mod cex;

#[cfg(feature = "cex")]
pub use cex::{Coinbase, Whitebit, Woo};
