//! OrderBook type - 호가창

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::safe_decimal;

/// 호가창
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    #[serde(default)]
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datetime: Option<String>,
    /// 매수호가 (가격 내림차순)
    #[serde(default)]
    pub bids: Vec<OrderBookEntry>,
    /// 매도호가 (가격 오름차순)
    #[serde(default)]
    pub asks: Vec<OrderBookEntry>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nonce: Option<i64>,
}

/// 호가 항목
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub amount: Decimal,
}

impl OrderBookEntry {
    pub fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }
}

impl OrderBook {
    /// 벤더 호가 목록으로부터 생성
    ///
    /// 각 항목은 `[price, amount]` 배열이나 `{price_key, amount_key}` 객체 모두
    /// 가능하다. 가격/수량이 없는 항목은 버리고, bids/asks는 정렬한다.
    pub fn from_levels(
        symbol: impl Into<String>,
        bids: &[Value],
        asks: &[Value],
        price_key: &str,
        amount_key: &str,
    ) -> Self {
        let parse = |levels: &[Value]| -> Vec<OrderBookEntry> {
            levels
                .iter()
                .filter_map(|level| {
                    let (price, amount) = if level.is_array() {
                        (safe_decimal(level, 0), safe_decimal(level, 1))
                    } else {
                        (safe_decimal(level, price_key), safe_decimal(level, amount_key))
                    };
                    Some(OrderBookEntry::new(price?, amount?))
                })
                .collect()
        };
        let mut book = Self {
            symbol: symbol.into(),
            bids: parse(bids),
            asks: parse(asks),
            ..Default::default()
        };
        book.sort();
        book
    }

    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = timestamp;
        self.datetime = timestamp.and_then(crate::utils::iso8601);
        self
    }

    /// bids 내림차순, asks 오름차순
    pub fn sort(&mut self) {
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
    }

    /// 최고 매수호가
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    /// 최저 매도호가
    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }

    /// 스프레드
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// 각 방향 상위 `limit`개만 남김
    pub fn truncate(&mut self, limit: usize) {
        self.bids.truncate(limit);
        self.asks.truncate(limit);
    }
}
