//! Utility functions

pub mod crypto;
pub mod filter;
pub mod precise;
pub mod precision;
pub mod safe;
pub mod time;

pub use filter::{filter_by_since_limit, filter_by_symbol, sort_by_timestamp, Timestamped};
pub use precise::Precise;
pub use precision::*;
pub use safe::*;
pub use time::{iso8601, now_ms, now_secs, parse8601};
