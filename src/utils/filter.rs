//! List filtering helpers
//!
//! 목록 응답을 `since`/`limit`/심볼/화폐로 거르는 CCXT의 filterBy* 헬퍼.

use crate::types::{LedgerEntry, Order, Trade, Transaction, TransferEntry, OHLCV};

/// 타임스탬프를 가진 통합 엔티티
pub trait Timestamped {
    fn timestamp(&self) -> Option<i64>;
}

macro_rules! impl_timestamped {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Timestamped for $ty {
                fn timestamp(&self) -> Option<i64> {
                    self.timestamp
                }
            }
        )*
    };
}

impl_timestamped!(Trade, Order, Transaction, LedgerEntry, TransferEntry);

impl Timestamped for OHLCV {
    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

/// 타임스탬프 오름차순 정렬 (없는 항목은 앞쪽)
pub fn sort_by_timestamp<T: Timestamped>(items: &mut [T]) {
    items.sort_by_key(|item| item.timestamp());
}

/// `since` 이후 항목만 남기고 가장 최근 `limit`개
///
/// 오름차순 목록은 뒤에서, 내림차순 목록은 앞에서 자른다. 첫/끝 타임스탬프를
/// 알 수 없으면 오름차순으로 본다.
pub fn filter_by_since_limit<T: Timestamped>(
    items: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
) -> Vec<T> {
    let mut items: Vec<T> = match since {
        Some(since) => items
            .into_iter()
            .filter(|item| item.timestamp().is_some_and(|ts| ts >= since))
            .collect(),
        None => items,
    };
    let Some(limit) = limit.map(|l| l as usize) else {
        return items;
    };
    if items.len() <= limit {
        return items;
    }
    let ascending = match (
        items.first().and_then(Timestamped::timestamp),
        items.last().and_then(Timestamped::timestamp),
    ) {
        (Some(first), Some(last)) => first < last,
        _ => true,
    };
    if ascending {
        items.split_off(items.len() - limit)
    } else {
        items.truncate(limit);
        items
    }
}

/// 심볼이 일치하는 체결/주문만
pub fn filter_by_symbol<T, F>(items: Vec<T>, symbol: Option<&str>, get: F) -> Vec<T>
where
    F: Fn(&T) -> Option<&str>,
{
    match symbol {
        Some(symbol) => items
            .into_iter()
            .filter(|item| get(item) == Some(symbol))
            .collect(),
        None => items,
    }
}
