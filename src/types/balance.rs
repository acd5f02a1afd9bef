//! Balance type - 잔고 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 잔고 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 화폐별 잔고
    #[serde(flatten)]
    pub currencies: HashMap<String, Balance>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub info: serde_json::Value,
}

/// 단일 화폐 잔고
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// 사용 가능
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<Decimal>,
    /// 주문 등에 묶인 금액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl Balance {
    pub fn new(free: Option<Decimal>, used: Option<Decimal>, total: Option<Decimal>) -> Self {
        Self { free, used, total }
    }

    /// 세 값 중 둘이 있으면 나머지를 계산
    pub fn complete(mut self) -> Self {
        match (self.free, self.used, self.total) {
            (Some(free), Some(used), None) => self.total = Some(free + used),
            (Some(free), None, Some(total)) => self.used = Some(total - free),
            (None, Some(used), Some(total)) => self.free = Some(total - used),
            _ => {},
        }
        self
    }

    /// 같은 화폐의 잔고를 합산 (여러 계정에 나뉜 경우)
    pub fn accumulate(&mut self, other: &Balance) {
        fn add(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
            match (a, b) {
                (Some(x), Some(y)) => Some(x + y),
                (x, None) => x,
                (None, y) => y,
            }
        }
        self.free = add(self.free, other.free);
        self.used = add(self.used, other.used);
        self.total = add(self.total, other.total);
    }
}

impl Balances {
    pub fn new(info: serde_json::Value) -> Self {
        Self {
            info,
            ..Default::default()
        }
    }

    /// 잔고 추가 (같은 코드가 있으면 합산)
    pub fn add(&mut self, code: impl Into<String>, balance: Balance) {
        self.currencies
            .entry(code.into())
            .and_modify(|existing| existing.accumulate(&balance))
            .or_insert(balance);
    }

    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.currencies.get(code)
    }

    /// 모든 잔고의 누락 필드 계산
    pub fn safe_balance(mut self) -> Self {
        self.currencies = self
            .currencies
            .into_iter()
            .map(|(code, balance)| (code, balance.complete()))
            .collect();
        self
    }
}
