//! Exchange trait - Unified exchange interface
//!
//! 모든 어댑터가 구현하는 통합 호출 인터페이스. 기본 구현은 `NotSupported`를
//! 돌려주고, 어댑터는 거래소가 제공하는 작업만 재정의한다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use super::{
    Account, Balances, Currency, DepositAddress, ExchangeDescriptor, LedgerEntry, Market, Order,
    OrderBook, OrderSide, OrderType, Position, Ticker, Trade, TradingFee, Transaction,
    TransferEntry, OHLCV,
};
use crate::client::MarketCache;
use crate::errors::{CcxtError, CcxtResult};

/// 통합 작업의 추가 파라미터
///
/// 벤더 파라미터는 그대로 요청에 실리고, 라우팅 키(`v3`, `paginate`, `stop` 등)는
/// 어댑터가 읽은 뒤 제거한다.
pub type Params = serde_json::Map<String, Value>;

/// Exchange ID - identifies the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Coinbase,
    Woo,
    Whitebit,
}

impl ExchangeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Coinbase => "coinbase",
            ExchangeId::Woo => "woo",
            ExchangeId::Whitebit => "whitebit",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 캔들 주기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "8h")]
    Hour8,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "3d")]
    Day3,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute3 => "3m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour2 => "2h",
            Timeframe::Hour4 => "4h",
            Timeframe::Hour6 => "6h",
            Timeframe::Hour8 => "8h",
            Timeframe::Hour12 => "12h",
            Timeframe::Day1 => "1d",
            Timeframe::Day3 => "3d",
            Timeframe::Week1 => "1w",
            Timeframe::Month1 => "1M",
        }
    }

    /// 초 단위 기간
    pub fn to_seconds(&self) -> i64 {
        match self {
            Timeframe::Minute1 => 60,
            Timeframe::Minute3 => 3 * 60,
            Timeframe::Minute5 => 5 * 60,
            Timeframe::Minute15 => 15 * 60,
            Timeframe::Minute30 => 30 * 60,
            Timeframe::Hour1 => 60 * 60,
            Timeframe::Hour2 => 2 * 60 * 60,
            Timeframe::Hour4 => 4 * 60 * 60,
            Timeframe::Hour6 => 6 * 60 * 60,
            Timeframe::Hour8 => 8 * 60 * 60,
            Timeframe::Hour12 => 12 * 60 * 60,
            Timeframe::Day1 => 24 * 60 * 60,
            Timeframe::Day3 => 3 * 24 * 60 * 60,
            Timeframe::Week1 => 7 * 24 * 60 * 60,
            Timeframe::Month1 => 30 * 24 * 60 * 60,
        }
    }

    /// 밀리초 단위 기간
    pub fn to_millis(&self) -> i64 {
        self.to_seconds() * 1000
    }
}

/// Exchange feature flags - indicates supported functionality
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeFeatures {
    // === Market Types ===
    pub spot: bool,
    pub margin: bool,
    pub swap: bool,
    pub future: bool,
    pub option: bool,

    // === Public API ===
    pub fetch_time: bool,
    pub fetch_status: bool,
    pub fetch_markets: bool,
    pub fetch_currencies: bool,
    pub fetch_ticker: bool,
    pub fetch_tickers: bool,
    pub fetch_bids_asks: bool,
    pub fetch_order_book: bool,
    pub fetch_trades: bool,
    pub fetch_ohlcv: bool,
    pub fetch_trading_fees: bool,

    // === Private Trading API ===
    pub fetch_accounts: bool,
    pub fetch_balance: bool,
    pub create_order: bool,
    pub edit_order: bool,
    pub cancel_order: bool,
    pub cancel_orders: bool,
    pub cancel_all_orders: bool,
    pub fetch_order: bool,
    pub fetch_orders: bool,
    pub fetch_open_orders: bool,
    pub fetch_closed_orders: bool,
    pub fetch_canceled_orders: bool,
    pub fetch_my_trades: bool,
    pub fetch_order_trades: bool,

    // === Account/Wallet ===
    pub fetch_ledger: bool,
    pub fetch_deposits: bool,
    pub fetch_withdrawals: bool,
    pub fetch_transactions: bool,
    pub fetch_deposit: bool,
    pub deposit: bool,
    pub withdraw: bool,
    pub fetch_deposit_address: bool,
    pub fetch_deposit_addresses_by_network: bool,
    pub create_deposit_address: bool,
    pub transfer: bool,
    pub fetch_transfers: bool,

    // === Positions ===
    pub fetch_position: bool,
    pub fetch_positions: bool,
}

impl ExchangeFeatures {
    /// camelCase 통합 작업 이름으로 지원 여부 조회
    pub fn get(&self, feature: &str) -> bool {
        match feature {
            "spot" => self.spot,
            "margin" => self.margin,
            "swap" => self.swap,
            "future" => self.future,
            "option" => self.option,
            "fetchTime" => self.fetch_time,
            "fetchStatus" => self.fetch_status,
            "fetchMarkets" => self.fetch_markets,
            "fetchCurrencies" => self.fetch_currencies,
            "fetchTicker" => self.fetch_ticker,
            "fetchTickers" => self.fetch_tickers,
            "fetchBidsAsks" => self.fetch_bids_asks,
            "fetchOrderBook" => self.fetch_order_book,
            "fetchTrades" => self.fetch_trades,
            "fetchOHLCV" => self.fetch_ohlcv,
            "fetchTradingFees" => self.fetch_trading_fees,
            "fetchAccounts" => self.fetch_accounts,
            "fetchBalance" => self.fetch_balance,
            "createOrder" => self.create_order,
            "editOrder" => self.edit_order,
            "cancelOrder" => self.cancel_order,
            "cancelOrders" => self.cancel_orders,
            "cancelAllOrders" => self.cancel_all_orders,
            "fetchOrder" => self.fetch_order,
            "fetchOrders" => self.fetch_orders,
            "fetchOpenOrders" => self.fetch_open_orders,
            "fetchClosedOrders" => self.fetch_closed_orders,
            "fetchCanceledOrders" => self.fetch_canceled_orders,
            "fetchMyTrades" => self.fetch_my_trades,
            "fetchOrderTrades" => self.fetch_order_trades,
            "fetchLedger" => self.fetch_ledger,
            "fetchDeposits" => self.fetch_deposits,
            "fetchWithdrawals" => self.fetch_withdrawals,
            "fetchTransactions" => self.fetch_transactions,
            "fetchDeposit" => self.fetch_deposit,
            "deposit" => self.deposit,
            "withdraw" => self.withdraw,
            "fetchDepositAddress" => self.fetch_deposit_address,
            "fetchDepositAddressesByNetwork" => self.fetch_deposit_addresses_by_network,
            "createDepositAddress" => self.create_deposit_address,
            "transfer" => self.transfer,
            "fetchTransfers" => self.fetch_transfers,
            "fetchPosition" => self.fetch_position,
            "fetchPositions" => self.fetch_positions,
            _ => false,
        }
    }
}

/// 거래소 URL 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeUrls {
    /// API 계열별 기본 URL (예: `v1public`, `v4private`)
    pub api: HashMap<String, String>,
    /// 샌드박스 API URL (없으면 샌드박스 미지원)
    #[serde(default)]
    pub test: HashMap<String, String>,
    pub www: Option<String>,
    pub doc: Vec<String>,
    pub fees: Option<String>,
}

/// 거래소 상태
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeStatus {
    /// `ok` / `maintenance`
    pub status: String,
    pub updated: Option<i64>,
    pub eta: Option<i64>,
    pub url: Option<String>,
    #[serde(default)]
    pub info: Value,
}

/// 서명된 요청
#[derive(Debug, Clone, Default)]
pub struct SignedRequest {
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// 거래소 통합 인터페이스
///
/// CCXT의 Exchange 클래스를 Rust trait으로 포팅
#[async_trait]
pub trait Exchange: Send + Sync {
    // === 메타데이터 ===

    /// 거래소 기술자 (엔드포인트, 수수료, 오류 테이블 등)
    fn descriptor(&self) -> &ExchangeDescriptor;

    /// 마켓/화폐 캐시
    fn cache(&self) -> &MarketCache;

    fn id(&self) -> ExchangeId {
        self.descriptor().id
    }

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// 지원 기능
    fn has(&self) -> &ExchangeFeatures {
        &self.descriptor().features
    }

    /// 특정 기능 지원 여부
    fn has_feature(&self, feature: &str) -> bool {
        self.has().get(feature)
    }

    // === 마켓 캐시 ===

    /// 마켓 로드 (캐싱)
    ///
    /// 화폐 목록을 먼저 받은 뒤 마켓을 받는다. 동시 reload는 조율하지 않는다.
    async fn load_markets(&self, reload: bool) -> CcxtResult<HashMap<String, Market>> {
        if !reload && self.cache().is_loaded()? {
            return self.cache().markets();
        }
        if self.has().fetch_currencies {
            let currencies = self.fetch_currencies(&Params::new()).await?;
            self.cache().set_currencies(currencies)?;
        }
        let markets = self.fetch_markets(&Params::new()).await?;
        self.cache().set_markets(markets)?;
        self.cache().markets()
    }

    /// 심볼로 마켓 조회
    fn market(&self, symbol: &str) -> CcxtResult<Market> {
        self.cache()
            .market(symbol)?
            .or(self.cache().market_by_id(symbol)?)
            .ok_or_else(|| CcxtError::BadSymbol {
                message: format!("{} does not have market symbol {symbol}", self.id()),
            })
    }

    /// 코드로 화폐 조회
    fn currency(&self, code: &str) -> CcxtResult<Currency> {
        self.cache()
            .currency(code)?
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("{} does not have currency code {code}", self.id()),
            })
    }

    /// 거래소 화폐 ID → 통합 코드
    fn safe_currency_code(&self, currency_id: Option<&str>) -> Option<String> {
        let id = currency_id?;
        if let Ok(Some(code)) = self.cache().currency_code_by_id(id) {
            return Some(code);
        }
        Some(self.descriptor().safe_currency_code(id))
    }

    /// 거래소 마켓 ID → 통합 심볼
    ///
    /// 캐시에 없으면 `delimiter`로 나눠 `BASE/QUOTE`를 만들고, 그것도 안 되면 ID를 그대로 쓴다.
    fn safe_symbol(&self, market_id: Option<&str>, delimiter: Option<&str>) -> Option<String> {
        let id = market_id?;
        if let Ok(Some(market)) = self.cache().market_by_id(id) {
            return Some(market.symbol);
        }
        if let Some(delimiter) = delimiter {
            let parts: Vec<&str> = id.split(delimiter).collect();
            if let [base, quote] = parts.as_slice() {
                let base = self.descriptor().safe_currency_code(base);
                let quote = self.descriptor().safe_currency_code(quote);
                return Some(super::build_symbol(&base, &quote, None, None));
            }
        }
        Some(id.to_string())
    }

    /// 파서용 마켓 해석
    ///
    /// 호출자가 넘긴 마켓이 우선이고, 다음은 캐시, 마지막으로 `delimiter`로 나눈
    /// 현물 마켓을 임시로 만든다.
    fn safe_market(
        &self,
        market_id: Option<&str>,
        market: Option<&Market>,
        delimiter: Option<&str>,
    ) -> Option<Market> {
        if let Some(market) = market {
            return Some(market.clone());
        }
        let id = market_id?;
        if let Ok(Some(cached)) = self.cache().market_by_id(id) {
            return Some(cached);
        }
        let (base, quote) = id.split_once(delimiter?)?;
        let descriptor = self.descriptor();
        let mut market = Market::spot(
            id,
            &descriptor.safe_currency_code(base),
            &descriptor.safe_currency_code(quote),
        );
        market.base_id = base.to_string();
        market.quote_id = quote.to_string();
        market.active = None;
        Some(market)
    }

    // === Public API ===

    /// 서버 시각 (밀리초)
    async fn fetch_time(&self, params: &Params) -> CcxtResult<i64> {
        let _ = params;
        Err(CcxtError::not_supported("fetchTime"))
    }

    /// 거래소 운영 상태
    async fn fetch_status(&self, params: &Params) -> CcxtResult<ExchangeStatus> {
        let _ = params;
        Err(CcxtError::not_supported("fetchStatus"))
    }

    /// 마켓 목록 조회
    async fn fetch_markets(&self, params: &Params) -> CcxtResult<Vec<Market>>;

    /// 화폐 목록 조회
    async fn fetch_currencies(&self, params: &Params) -> CcxtResult<HashMap<String, Currency>> {
        let _ = params;
        Err(CcxtError::not_supported("fetchCurrencies"))
    }

    /// 시세 조회
    async fn fetch_ticker(&self, symbol: &str, params: &Params) -> CcxtResult<Ticker> {
        let _ = (symbol, params);
        Err(CcxtError::not_supported("fetchTicker"))
    }

    /// 복수 시세 조회
    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<HashMap<String, Ticker>> {
        let _ = (symbols, params);
        Err(CcxtError::not_supported("fetchTickers"))
    }

    /// 최우선 호가
    async fn fetch_bids_asks(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<HashMap<String, Ticker>> {
        let _ = (symbols, params);
        Err(CcxtError::not_supported("fetchBidsAsks"))
    }

    /// 호가창 조회
    async fn fetch_order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<OrderBook> {
        let _ = (symbol, limit, params);
        Err(CcxtError::not_supported("fetchOrderBook"))
    }

    /// OHLCV 조회
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<OHLCV>> {
        let _ = (symbol, timeframe, since, limit, params);
        Err(CcxtError::not_supported("fetchOHLCV"))
    }

    /// 체결 내역 조회
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchTrades"))
    }

    /// 마켓별 거래 수수료
    async fn fetch_trading_fees(&self, params: &Params) -> CcxtResult<HashMap<String, TradingFee>> {
        let _ = params;
        Err(CcxtError::not_supported("fetchTradingFees"))
    }

    // === Private API ===

    /// 계정 목록
    async fn fetch_accounts(&self, params: &Params) -> CcxtResult<Vec<Account>> {
        let _ = params;
        Err(CcxtError::not_supported("fetchAccounts"))
    }

    /// 잔고 조회
    async fn fetch_balance(&self, params: &Params) -> CcxtResult<Balances> {
        let _ = params;
        Err(CcxtError::not_supported("fetchBalance"))
    }

    /// 주문 생성
    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        params: &Params,
    ) -> CcxtResult<Order> {
        let _ = (symbol, order_type, side, amount, price, params);
        Err(CcxtError::not_supported("createOrder"))
    }

    /// 지정가 주문 생성
    async fn create_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
        params: &Params,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Limit, side, amount, Some(price), params)
            .await
    }

    /// 시장가 주문 생성
    async fn create_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
        params: &Params,
    ) -> CcxtResult<Order> {
        self.create_order(symbol, OrderType::Market, side, amount, None, params)
            .await
    }

    /// 주문 수정
    #[allow(clippy::too_many_arguments)]
    async fn edit_order(
        &self,
        id: &str,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Option<Decimal>,
        price: Option<Decimal>,
        params: &Params,
    ) -> CcxtResult<Order> {
        let _ = (id, symbol, order_type, side, amount, price, params);
        Err(CcxtError::not_supported("editOrder"))
    }

    /// 주문 취소
    async fn cancel_order(&self, id: &str, symbol: Option<&str>, params: &Params) -> CcxtResult<Order> {
        let _ = (id, symbol, params);
        Err(CcxtError::not_supported("cancelOrder"))
    }

    /// 복수 주문 취소
    async fn cancel_orders(
        &self,
        ids: &[&str],
        symbol: Option<&str>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(self.cancel_order(id, symbol, params).await?);
        }
        Ok(results)
    }

    /// 전체 주문 취소
    async fn cancel_all_orders(&self, symbol: Option<&str>, params: &Params) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, params);
        Err(CcxtError::not_supported("cancelAllOrders"))
    }

    /// 주문 조회
    async fn fetch_order(&self, id: &str, symbol: Option<&str>, params: &Params) -> CcxtResult<Order> {
        let _ = (id, symbol, params);
        Err(CcxtError::not_supported("fetchOrder"))
    }

    /// 전체 주문 목록
    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchOrders"))
    }

    /// 미체결 주문 목록
    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchOpenOrders"))
    }

    /// 체결 완료 주문 목록
    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchClosedOrders"))
    }

    /// 취소된 주문 목록
    async fn fetch_canceled_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchCanceledOrders"))
    }

    /// 내 체결 내역
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchMyTrades"))
    }

    /// 주문별 체결 내역
    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        let _ = (id, symbol, since, limit, params);
        Err(CcxtError::not_supported("fetchOrderTrades"))
    }

    // === 입출금 ===

    /// 원장 내역
    async fn fetch_ledger(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<LedgerEntry>> {
        let _ = (code, since, limit, params);
        Err(CcxtError::not_supported("fetchLedger"))
    }

    /// 입금 내역
    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit, params);
        Err(CcxtError::not_supported("fetchDeposits"))
    }

    /// 출금 내역
    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit, params);
        Err(CcxtError::not_supported("fetchWithdrawals"))
    }

    /// 입출금 내역
    async fn fetch_transactions(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let _ = (code, since, limit, params);
        Err(CcxtError::not_supported("fetchTransactions"))
    }

    /// 단일 입금 조회
    async fn fetch_deposit(&self, id: &str, code: Option<&str>, params: &Params) -> CcxtResult<Transaction> {
        let _ = (id, code, params);
        Err(CcxtError::not_supported("fetchDeposit"))
    }

    /// 결제 수단으로 입금
    async fn deposit(
        &self,
        code: &str,
        amount: Decimal,
        payment_method_id: &str,
        params: &Params,
    ) -> CcxtResult<Transaction> {
        let _ = (code, amount, payment_method_id, params);
        Err(CcxtError::not_supported("deposit"))
    }

    /// 출금
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> CcxtResult<Transaction> {
        let _ = (code, amount, address, tag, params);
        Err(CcxtError::not_supported("withdraw"))
    }

    /// 입금 주소
    async fn fetch_deposit_address(&self, code: &str, params: &Params) -> CcxtResult<DepositAddress> {
        let _ = (code, params);
        Err(CcxtError::not_supported("fetchDepositAddress"))
    }

    /// 네트워크별 입금 주소
    async fn fetch_deposit_addresses_by_network(
        &self,
        code: &str,
        params: &Params,
    ) -> CcxtResult<HashMap<String, DepositAddress>> {
        let _ = (code, params);
        Err(CcxtError::not_supported("fetchDepositAddressesByNetwork"))
    }

    /// 새 입금 주소 생성
    async fn create_deposit_address(&self, code: &str, params: &Params) -> CcxtResult<DepositAddress> {
        let _ = (code, params);
        Err(CcxtError::not_supported("createDepositAddress"))
    }

    /// 계정 간 이체
    async fn transfer(
        &self,
        code: &str,
        amount: Decimal,
        from_account: &str,
        to_account: &str,
        params: &Params,
    ) -> CcxtResult<TransferEntry> {
        let _ = (code, amount, from_account, to_account, params);
        Err(CcxtError::not_supported("transfer"))
    }

    /// 이체 내역
    async fn fetch_transfers(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<TransferEntry>> {
        let _ = (code, since, limit, params);
        Err(CcxtError::not_supported("fetchTransfers"))
    }

    // === 포지션 ===

    /// 포지션 목록
    async fn fetch_positions(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<Vec<Position>> {
        let _ = (symbols, params);
        Err(CcxtError::not_supported("fetchPositions"))
    }

    /// 단일 포지션
    async fn fetch_position(&self, symbol: &str, params: &Params) -> CcxtResult<Position> {
        let _ = (symbol, params);
        Err(CcxtError::not_supported("fetchPosition"))
    }

    // === 서명 ===

    /// 요청 서명
    ///
    /// private 요청에 인증 정보가 없으면 네트워크 호출 전에 `AuthenticationError`.
    fn sign(&self, path: &str, api: &str, method: &str, params: &Params) -> CcxtResult<SignedRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_durations() {
        assert_eq!(Timeframe::Minute15.to_seconds(), 900);
        assert_eq!(Timeframe::Day1.to_millis(), 86_400_000);
        assert_eq!(Timeframe::Month1.as_str(), "1M");
    }

    #[test]
    fn test_feature_lookup_by_unified_name() {
        let features = ExchangeFeatures {
            fetch_ohlcv: true,
            fetch_positions: true,
            ..Default::default()
        };
        assert!(features.get("fetchOHLCV"));
        assert!(features.get("fetchPositions"));
        assert!(!features.get("fetchTicker"));
        assert!(!features.get("watchTicker"));
    }

    #[test]
    fn test_exchange_id_display() {
        assert_eq!(ExchangeId::Whitebit.to_string(), "whitebit");
    }
}
