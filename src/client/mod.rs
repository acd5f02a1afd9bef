//! HTTP Client and related utilities

mod cache;
mod config;
mod http;
mod pagination;
mod rate_limiter;

pub use cache::{MarketCache, TtlCell};
pub use config::{ExchangeConfig, DEFAULT_MAX_PAGES};
pub use http::{
    implode_params, omit, param_to_string, parse_json, urlencode, urlencode_with_array_repeat,
    with_query, HttpClient,
};
pub use pagination::{paginate_cursor, paginate_offset, take_paginate, Page};
pub use rate_limiter::RateLimiter;
