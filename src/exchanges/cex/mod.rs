//! Centralized exchanges
//!
//! 중앙화 거래소 REST 어댑터

mod coinbase;
mod whitebit;
mod woo;

pub use coinbase::Coinbase;
pub use whitebit::Whitebit;
pub use woo::Woo;
