//! Market metadata caching
//!
//! 인스턴스별 마켓/화폐 캐시. `load_markets`가 처음 호출될 때 채워지고
//! 명시적인 reload 때만 교체된다. 동시 reload는 마지막 쓰기가 이긴다.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::errors::{CcxtError, CcxtResult};
use crate::types::{Currency, Market};

#[derive(Debug, Default)]
struct CacheInner {
    loaded: bool,
    markets: HashMap<String, Market>,
    /// market id → symbol
    markets_by_id: HashMap<String, String>,
    currencies: HashMap<String, Currency>,
    /// currency id → code
    currencies_by_id: HashMap<String, String>,
}

/// 마켓/화폐 캐시
#[derive(Debug, Default)]
pub struct MarketCache {
    inner: RwLock<CacheInner>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CcxtResult<RwLockReadGuard<'_, CacheInner>> {
        self.inner.read().map_err(|_| CcxtError::ExchangeError {
            message: "Failed to acquire read lock".into(),
        })
    }

    fn write(&self) -> CcxtResult<RwLockWriteGuard<'_, CacheInner>> {
        self.inner.write().map_err(|_| CcxtError::ExchangeError {
            message: "Failed to acquire write lock".into(),
        })
    }

    pub fn is_loaded(&self) -> CcxtResult<bool> {
        Ok(self.read()?.loaded)
    }

    /// 마켓 목록 교체
    pub fn set_markets(&self, markets: Vec<Market>) -> CcxtResult<()> {
        let mut by_symbol = HashMap::with_capacity(markets.len());
        let mut by_id = HashMap::with_capacity(markets.len());
        for market in markets {
            by_id
                .entry(market.id.clone())
                .or_insert_with(|| market.symbol.clone());
            by_symbol.insert(market.symbol.clone(), market);
        }

        let mut inner = self.write()?;
        inner.markets = by_symbol;
        inner.markets_by_id = by_id;
        inner.loaded = true;
        Ok(())
    }

    /// 화폐 목록 교체
    pub fn set_currencies(&self, currencies: HashMap<String, Currency>) -> CcxtResult<()> {
        let by_id = currencies
            .values()
            .map(|c| (c.id.clone(), c.code.clone()))
            .collect();

        let mut inner = self.write()?;
        inner.currencies = currencies;
        inner.currencies_by_id = by_id;
        Ok(())
    }

    pub fn markets(&self) -> CcxtResult<HashMap<String, Market>> {
        Ok(self.read()?.markets.clone())
    }

    pub fn currencies(&self) -> CcxtResult<HashMap<String, Currency>> {
        Ok(self.read()?.currencies.clone())
    }

    pub fn market(&self, symbol: &str) -> CcxtResult<Option<Market>> {
        Ok(self.read()?.markets.get(symbol).cloned())
    }

    pub fn market_by_id(&self, id: &str) -> CcxtResult<Option<Market>> {
        let inner = self.read()?;
        Ok(inner
            .markets_by_id
            .get(id)
            .and_then(|symbol| inner.markets.get(symbol))
            .cloned())
    }

    pub fn currency(&self, code: &str) -> CcxtResult<Option<Currency>> {
        Ok(self.read()?.currencies.get(code).cloned())
    }

    pub fn currency_code_by_id(&self, id: &str) -> CcxtResult<Option<String>> {
        Ok(self.read()?.currencies_by_id.get(id).cloned())
    }
}

/// 짧은 TTL 값 슬롯
#[derive(Debug)]
pub struct TtlCell<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCell<T> {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl: Duration::from_millis(ttl_ms),
            slot: Mutex::new(None),
        }
    }

    /// 만료되지 않은 값
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().ok()?;
        match slot.as_ref() {
            Some((stored, value)) if stored.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    pub fn set(&self, value: T) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some((Instant::now(), value));
        }
    }
}
