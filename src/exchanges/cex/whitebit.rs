//! WhiteBIT Exchange Implementation
//!
//! WhiteBIT 거래소 API 구현. 시세는 v1/v4 public, 계정 작업은 모두 v4 private POST.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::client::{
    implode_params, omit, paginate_offset, param_to_string, parse_json, take_paginate, with_query,
    ExchangeConfig, HttpClient, MarketCache, RateLimiter,
};
use crate::crypto::{Credentials, SigningScheme};
use crate::errors::{CcxtError, CcxtResult, RequestContext};
use crate::types::{
    Balance, Balances, Currency, CurrencyNetwork, DepositAddress, Exchange, ExchangeDescriptor,
    ExchangeId, ExchangeStatus, ExchangeUrls, Fee, FeeSchedule, MarginMode, Market, MinMax, Order,
    OrderBook, OrderSide, OrderStatus, OrderType, Params, Position, SignedRequest, TakerOrMaker,
    Ticker, Timeframe, Trade, TradingFee, Transaction, TransactionStatus, TransactionType,
    TransferEntry, OHLCV,
};
use crate::utils::crypto::base64_encode;
use crate::utils::{
    amount_to_precision, filter_by_since_limit, filter_by_symbol, now_ms, parse_decimal,
    precision_from_digits, price_to_precision, safe_bool, safe_decimal, safe_decimal_n, safe_dict, safe_integer,
    safe_list, safe_string, safe_string2, safe_timestamp, safe_timestamp_n, safe_value,
    sort_by_timestamp,
};

const BASE_URL: &str = "https://whitebit.com";
const RATE_LIMIT_MS: u64 = 500;
const HISTORY_PAGE_SIZE: u32 = 100;
const KLINE_MAX_LIMIT: u32 = 1440;

/// WhiteBIT 거래소
pub struct Whitebit {
    config: ExchangeConfig,
    descriptor: ExchangeDescriptor,
    client: HttpClient,
    rate_limiter: RateLimiter,
    cache: MarketCache,
    last_nonce: AtomicI64,
}

impl Whitebit {
    /// 새 WhiteBIT 인스턴스 생성
    pub fn new(config: ExchangeConfig) -> CcxtResult<Self> {
        let descriptor = Self::describe();
        let client = HttpClient::new(&config)?;
        let rate_limiter =
            RateLimiter::new(config.rate_limit_ms().unwrap_or(descriptor.rate_limit_ms));

        Ok(Self {
            config,
            descriptor,
            client,
            rate_limiter,
            cache: MarketCache::new(),
            last_nonce: AtomicI64::new(0),
        })
    }

    fn describe() -> ExchangeDescriptor {
        let mut descriptor = ExchangeDescriptor::new(ExchangeId::Whitebit, "WhiteBit", "v4");
        descriptor.rate_limit_ms = RATE_LIMIT_MS;
        descriptor.features = feature_flags! {
            spot, margin, swap,
            fetch_time, fetch_status, fetch_markets, fetch_currencies,
            fetch_ticker, fetch_tickers, fetch_order_book, fetch_trades, fetch_ohlcv,
            fetch_trading_fees, fetch_balance,
            create_order, cancel_order, fetch_open_orders, fetch_closed_orders,
            fetch_my_trades, fetch_order_trades,
            fetch_deposits, fetch_withdrawals, fetch_deposit, fetch_deposit_address,
            withdraw, transfer, fetch_positions,
        };
        descriptor.urls = ExchangeUrls {
            api: api_urls! {
                "v1public" => format!("{BASE_URL}/api/v1/public"),
                "v1private" => format!("{BASE_URL}/api/v1"),
                "v2public" => format!("{BASE_URL}/api/v2/public"),
                "v4public" => format!("{BASE_URL}/api/v4/public"),
                "v4private" => format!("{BASE_URL}/api/v4"),
            },
            www: Some("https://www.whitebit.com".into()),
            doc: vec!["https://github.com/whitebit-exchange/api-docs".into()],
            fees: Some("https://whitebit.com/fee-schedule".into()),
            ..Default::default()
        };
        descriptor.timeframes = timeframe_map! {
            Minute1 => "1m",
            Minute3 => "3m",
            Minute5 => "5m",
            Minute15 => "15m",
            Minute30 => "30m",
            Hour1 => "1h",
            Hour2 => "2h",
            Hour4 => "4h",
            Hour6 => "6h",
            Hour8 => "8h",
            Hour12 => "12h",
            Day1 => "1d",
            Day3 => "3d",
            Week1 => "1w",
            Month1 => "1M",
        };
        descriptor.fees = FeeSchedule::flat(Decimal::new(1, 3), Decimal::new(1, 3));
        descriptor.options = json!({
            "fiatCurrencies": ["EUR", "USD", "RUB", "UAH"],
            "fetchBalance": { "account": "spot" },
            "accountsByType": {
                "main": "main",
                "spot": "spot",
                "margin": "collateral",
                "trade": "spot",
            },
            "networksById": { "BEP20": "BSC" },
            "defaultType": "spot",
            "brokerId": "ccxt",
        });
        descriptor.exceptions = exception_table! {
            exact: {
                "Unauthorized request." => AuthenticationError,
                "The market format is invalid." => BadSymbol,
                "Market is not available" => BadSymbol,
                "Invalid payload." => BadRequest,
                "Amount must be greater than 0" => InvalidOrder,
                "Not enough balance." => InsufficientFunds,
                "The order id field is required." => InvalidOrder,
                "Not enough balance" => InsufficientFunds,
                "This action is unauthorized." => PermissionDenied,
                "This API Key is not authorized to perform this action." => PermissionDenied,
                "Unexecuted order was not found." => OrderNotFound,
                "The selected from is invalid." => BadRequest,
                "503" => ExchangeNotAvailable,
                "422" => OrderNotFound,
            },
            broad: {
                "Given amount is less than min amount" => InvalidOrder,
                "Total is less than" => InvalidOrder,
                "fee must be no less than" => InvalidOrder,
                "Enable your key in API settings" => PermissionDenied,
                "You don't have such amount for transfer" => InsufficientFunds,
            },
        };
        descriptor
    }

    /// 단조 증가 nonce (밀리초)
    fn next_nonce(&self) -> i64 {
        let now = now_ms();
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1)
    }

    fn option(&self, key: &str) -> Option<Value> {
        self.descriptor.option(self.config.options(), key)
    }

    fn is_fiat(&self, code: &str) -> bool {
        self.option("fiatCurrencies")
            .and_then(|v| v.as_array().cloned())
            .is_some_and(|list| list.iter().any(|c| c.as_str() == Some(code)))
    }

    /// 요청 실행: 가중치 대기 → 서명 → 전송 → 오류 매핑
    async fn request(&self, path: &str, api: &str, method: &str, params: &Params) -> CcxtResult<Value> {
        self.rate_limiter
            .throttle(self.descriptor.cost(api, method, path))
            .await;
        let signed = self.sign(path, api, method, params)?;
        tracing::debug!(exchange = "whitebit", method = %signed.method, url = %signed.url, "request");

        let (status, body) = self.client.execute(&signed).await?;
        let context = RequestContext::new(self.descriptor.id.as_str(), &signed.method, &signed.url);
        self.handle_errors(status, &context, &body)?;
        parse_json(&body)
    }

    async fn public_get(&self, path: &str, api: &str, params: &Params) -> CcxtResult<Value> {
        self.request(path, api, "GET", params).await
    }

    async fn private_post(&self, path: &str, params: &Params) -> CcxtResult<Value> {
        self.request(path, "v4private", "POST", params).await
    }

    /// 벤더 오류 → 통합 오류
    fn handle_errors(&self, status: u16, context: &RequestContext, body: &str) -> CcxtResult<()> {
        if status == 418 || status == 429 {
            tracing::warn!(exchange = "whitebit", status, "request throttled");
            return Err(CcxtError::DDoSProtection {
                message: format!("{} {status} {body}", context.exchange),
            });
        }
        if status == 404 {
            return Err(CcxtError::ExchangeError {
                message: format!("{} {status} endpoint not found", context.exchange),
            });
        }

        let feedback = context.feedback(body);
        let response = match serde_json::from_str::<Value>(body) {
            Ok(response) => response,
            Err(_) if status >= 400 => return Err(CcxtError::ExchangeError { message: feedback }),
            Err(_) => return Ok(()),
        };

        let error_status = safe_string(&response, "status").filter(|s| s != "200");
        let code = safe_integer(&response, "code");
        if error_status.is_none() && code.is_none() {
            if status >= 400 {
                return Err(CcxtError::ExchangeError { message: feedback });
            }
            return Ok(());
        }

        let error_info = error_status.or_else(|| {
            safe_dict(&response, "errors")
                .and_then(|errors| errors.values().next())
                .and_then(|messages| safe_string(messages, 0))
                .or_else(|| safe_string(&response, "message"))
        });
        tracing::warn!(exchange = "whitebit", status, error = ?error_info, "vendor error");

        let exceptions = &self.descriptor.exceptions;
        exceptions.throw_exactly_matched(error_info.as_deref(), &feedback)?;
        exceptions.throw_broadly_matched(Some(body), &feedback)?;
        Err(CcxtError::ExchangeError { message: feedback })
    }

    // === 파서 ===

    fn parse_market(&self, data: &Value) -> Option<Market> {
        let id = safe_string(data, "name")?;
        let base_id = safe_string(data, "stock")?;
        let quote_id = safe_string(data, "money")
            .map(|q| if q == "PERP" { "USDT".to_string() } else { q })?;
        let base = self.descriptor.safe_currency_code(&base_id);
        let quote = self.descriptor.safe_currency_code(&quote_id);
        let swap = safe_string(data, "type").as_deref() == Some("futures");

        let mut market = if swap {
            Market::linear_swap(id, &base, &quote)
        } else {
            Market::spot(id, &base, &quote)
        };
        market.base_id = base_id;
        market.quote_id = quote_id.clone();
        if swap {
            market.settle_id = Some(quote_id);
        }
        market.margin = safe_bool(data, "isCollateral").unwrap_or(false) && !swap;
        market.active = safe_bool(data, "tradesEnabled");

        // 마켓 수수료는 퍼센트 단위
        market.maker = safe_decimal(data, "makerFee").map(|fee| fee / Decimal::ONE_HUNDRED);
        market.taker = safe_decimal(data, "takerFee").map(|fee| fee / Decimal::ONE_HUNDRED);

        let amount_tick = safe_integer(data, "stockPrec").map(|d| precision_from_digits(d as i32));
        market.precision.amount = amount_tick;
        market.precision.price =
            safe_integer(data, "moneyPrec").map(|d| precision_from_digits(d as i32));
        if swap {
            market.contract_size = amount_tick;
        }
        market.limits.amount = MinMax::new(safe_decimal(data, "minAmount"), None);
        market.limits.cost = MinMax::new(safe_decimal(data, "minTotal"), None);
        market.info = data.clone();
        Some(market)
    }

    fn parse_currency(&self, id: &str, data: &Value) -> Currency {
        let can_deposit = safe_bool(data, "can_deposit").unwrap_or(true);
        let can_withdraw = safe_bool(data, "can_withdraw").unwrap_or(true);

        let networks_by_id = self.option("networksById").unwrap_or(Value::Null);
        let listed = |key: &str| -> Vec<String> {
            safe_value(data, "networks")
                .and_then(|n| safe_list(n, key))
                .map(|list| list.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default()
        };
        let deposits = listed("deposits");
        let withdraws = listed("withdraws");
        let mut networks = HashMap::new();
        for network_id in deposits.iter().chain(withdraws.iter()) {
            let code = safe_string(&networks_by_id, network_id.as_str())
                .unwrap_or_else(|| network_id.clone());
            networks.entry(code.clone()).or_insert_with(|| CurrencyNetwork {
                id: network_id.clone(),
                network: code,
                deposit: Some(deposits.contains(network_id)),
                withdraw: Some(withdraws.contains(network_id)),
                ..Default::default()
            });
        }

        let mut currency = Currency {
            id: id.to_string(),
            code: self.descriptor.safe_currency_code(id),
            name: safe_string(data, "name"),
            active: Some(can_deposit && can_withdraw),
            deposit: Some(can_deposit),
            withdraw: Some(can_withdraw),
            networks,
            info: data.clone(),
            ..Default::default()
        };
        currency.limits.withdraw = MinMax::new(
            safe_decimal(data, "min_withdraw"),
            safe_decimal(data, "max_withdraw").filter(|max| !max.is_zero()),
        );
        currency
    }

    fn parse_ticker(&self, data: &Value, symbol: &str) -> Ticker {
        let last = safe_decimal(data, "last_price");
        Ticker {
            symbol: symbol.to_string(),
            high: safe_decimal(data, "high"),
            low: safe_decimal(data, "low"),
            bid: safe_decimal(data, "bid"),
            ask: safe_decimal(data, "ask"),
            open: safe_decimal(data, "open"),
            last,
            close: last,
            percentage: safe_decimal(data, "change"),
            base_volume: safe_decimal_n(data, &["base_volume", "volume"]),
            quote_volume: safe_decimal_n(data, &["quote_volume", "deal"]),
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_trade(&self, data: &Value, market: Option<&Market>) -> Trade {
        let market = self.safe_market(safe_string(data, "market").as_deref(), market, Some("_"));
        let taker_or_maker = safe_integer(data, "role").map(|role| {
            if role == 1 {
                TakerOrMaker::Maker
            } else {
                TakerOrMaker::Taker
            }
        });
        let fee = safe_decimal(data, "fee")
            .map(|cost| Fee::new(Some(cost), market.as_ref().map(|m| m.quote.clone())));

        Trade {
            id: safe_string2(data, "id", "tradeID"),
            order: safe_string2(data, "dealOrderId", "orderId"),
            timestamp: safe_timestamp_n(data, &["time", "trade_timestamp"]),
            symbol: market.map(|m| m.symbol),
            side: safe_string2(data, "type", "side").and_then(|s| OrderSide::parse(&s)),
            taker_or_maker,
            price: safe_decimal(data, "price"),
            amount: safe_decimal_n(data, &["amount", "quote_volume"]),
            cost: safe_decimal(data, "deal"),
            fee,
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_ohlcv(&self, row: &Value) -> Option<OHLCV> {
        Some(OHLCV::new(
            safe_timestamp(row, 0)?,
            safe_decimal(row, 1),
            safe_decimal(row, 3),
            safe_decimal(row, 4),
            safe_decimal(row, 2),
            safe_decimal(row, 5),
        ))
    }

    fn parse_order_type(order_type: &str) -> Option<OrderType> {
        match order_type {
            "limit" | "stop limit" | "margin limit" => Some(OrderType::Limit),
            "market" | "stop market" | "stock market" | "margin market" => Some(OrderType::Market),
            _ => None,
        }
    }

    fn parse_order(&self, data: &Value, market: Option<&Market>) -> Order {
        let market = self.safe_market(safe_string(data, "market").as_deref(), market, Some("_"));
        let side = safe_string(data, "side");
        let order_type = safe_string(data, "type");
        let filled = safe_decimal(data, "dealStock");

        // 시장가 매수의 amount는 견적 화폐 기준이라 체결 수량으로 대체
        let is_market_buy = side.as_deref() == Some("buy")
            && matches!(order_type.as_deref(), Some("market") | Some("stop market"));
        let amount = if is_market_buy {
            filled
        } else {
            safe_decimal(data, "amount")
        };
        let fee = safe_decimal(data, "dealFee")
            .map(|cost| Fee::new(Some(cost), market.as_ref().map(|m| m.quote.clone())));

        Order {
            id: safe_string2(data, "orderId", "id").unwrap_or_default(),
            client_order_id: safe_string(data, "clientOrderId").filter(|s| !s.is_empty()),
            timestamp: safe_timestamp_n(data, &["ctime", "timestamp"]),
            last_trade_timestamp: safe_timestamp(data, "ftime"),
            symbol: market.map(|m| m.symbol),
            order_type: order_type.as_deref().and_then(Self::parse_order_type),
            side: side.as_deref().and_then(OrderSide::parse),
            price: safe_decimal(data, "price"),
            trigger_price: safe_decimal(data, "activation_price"),
            amount,
            filled,
            remaining: safe_decimal(data, "left"),
            cost: safe_decimal(data, "dealMoney"),
            post_only: safe_bool(data, "postOnly"),
            fee,
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_balance(&self, response: &Value) -> Balances {
        let mut balances = Balances::new(response.clone());
        if let Some(entries) = response.as_object() {
            for (id, entry) in entries {
                let code = self.descriptor.safe_currency_code(id);
                let balance = if entry.is_object() {
                    Balance::new(
                        safe_decimal(entry, "available"),
                        safe_decimal(entry, "freeze"),
                        safe_decimal(entry, "main_balance"),
                    )
                } else {
                    Balance::new(None, None, parse_decimal(&param_to_string(entry)))
                };
                balances.add(code, balance);
            }
        }
        balances.safe_balance()
    }

    fn parse_transaction_status(status: &str) -> Option<TransactionStatus> {
        match status {
            "3" | "7" => Some(TransactionStatus::Ok),
            "4" | "9" => Some(TransactionStatus::Canceled),
            "1" | "2" | "5" | "6" | "10" | "11" | "12" | "13" | "14" | "15" | "16" | "17" => {
                Some(TransactionStatus::Pending)
            },
            _ => None,
        }
    }

    fn parse_transaction(&self, data: &Value, code: Option<&str>) -> Transaction {
        let currency = self
            .safe_currency_code(safe_string(data, "ticker").as_deref())
            .or_else(|| code.map(String::from));
        let address = safe_string(data, "address");
        let is_deposit = safe_string(data, "method").as_deref() == Some("1");

        Transaction {
            id: safe_string(data, "uniqueId"),
            txid: safe_string(data, "transactionHash"),
            timestamp: safe_timestamp(data, "createdAt"),
            tx_type: Some(if is_deposit {
                TransactionType::Deposit
            } else {
                TransactionType::Withdrawal
            }),
            network: safe_string(data, "network"),
            address_from: if is_deposit { address.clone() } else { None },
            address_to: if is_deposit { None } else { address.clone() },
            address,
            amount: safe_decimal(data, "amount"),
            status: safe_string(data, "status")
                .as_deref()
                .and_then(Self::parse_transaction_status),
            comment: safe_string(data, "description"),
            fee: Fee::new(safe_decimal(data, "fee"), currency.clone()).non_empty(),
            currency,
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_position(&self, data: &Value, market: Option<&Market>) -> Position {
        let market = self.safe_market(safe_string(data, "market").as_deref(), market, Some("_"));
        Position {
            symbol: market
                .as_ref()
                .map(|m| m.symbol.clone())
                .unwrap_or_default(),
            id: safe_string(data, "positionId"),
            timestamp: safe_timestamp(data, "modifyDate"),
            contract_size: market.and_then(|m| m.contract_size),
            leverage: safe_decimal(data, "leverage"),
            unrealized_pnl: safe_decimal(data, "pnl"),
            collateral: safe_decimal(data, "margin"),
            initial_margin: safe_decimal(data, "margin"),
            entry_price: safe_decimal(data, "basePrice"),
            liquidation_price: safe_decimal(data, "liquidationPrice"),
            margin_mode: Some(MarginMode::Cross),
            info: data.clone(),
            ..Default::default()
        }
        .with_signed_size(safe_decimal(data, "amount"))
        .complete()
    }

    /// `main-account/history` 조회 (1 = 입금, 2 = 출금)
    async fn fetch_history(
        &self,
        method: u8,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        self.load_markets(false).await?;
        let (paginate, rest) = take_paginate(params);
        let mut request = Params::new();
        request.insert("transactionMethod".into(), json!(method));
        if let Some(code) = code {
            request.insert("ticker".into(), json!(self.currency(code)?.id));
        }
        request.extend(rest);

        let page_size = limit.map_or(HISTORY_PAGE_SIZE, |l| l.min(HISTORY_PAGE_SIZE));
        let fetch_page = |offset: u32| {
            let mut page_request = request.clone();
            page_request.insert("limit".into(), json!(page_size));
            page_request.insert("offset".into(), json!(offset));
            async move {
                let response = self.private_post("main-account/history", &page_request).await?;
                let records = safe_list(&response, "records")
                    .map(|records| {
                        records
                            .iter()
                            .map(|r| self.parse_transaction(r, code))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok::<Vec<Transaction>, CcxtError>(records)
            }
        };

        let transactions = if paginate {
            paginate_offset(self.config.max_pages(), page_size, fetch_page).await?
        } else {
            fetch_page(0).await?
        };
        Ok(filter_by_since_limit(transactions, since, limit))
    }
}

#[async_trait]
impl Exchange for Whitebit {
    fn descriptor(&self) -> &ExchangeDescriptor {
        &self.descriptor
    }

    fn cache(&self) -> &MarketCache {
        &self.cache
    }

    async fn fetch_time(&self, params: &Params) -> CcxtResult<i64> {
        let response = self.public_get("time", "v4public", params).await?;
        safe_timestamp(&response, "time").ok_or_else(|| CcxtError::BadResponse {
            message: "whitebit fetchTime: missing time".into(),
        })
    }

    async fn fetch_status(&self, params: &Params) -> CcxtResult<ExchangeStatus> {
        let response = self.public_get("ping", "v4public", params).await?;
        let status = safe_string(&response, 0).unwrap_or_default();
        Ok(ExchangeStatus {
            status: if status == "pong" { "ok".into() } else { status },
            info: response,
            ..Default::default()
        })
    }

    async fn fetch_markets(&self, params: &Params) -> CcxtResult<Vec<Market>> {
        let response = self.public_get("markets", "v4public", params).await?;
        let markets = response.as_array().ok_or_else(|| CcxtError::BadResponse {
            message: "whitebit fetchMarkets: expected an array".into(),
        })?;
        Ok(markets.iter().filter_map(|m| self.parse_market(m)).collect())
    }

    async fn fetch_currencies(&self, params: &Params) -> CcxtResult<HashMap<String, Currency>> {
        let response = self.public_get("assets", "v4public", params).await?;
        let assets = response.as_object().cloned().unwrap_or_default();
        Ok(assets
            .iter()
            .map(|(id, data)| {
                let currency = self.parse_currency(id, data);
                (currency.code.clone(), currency)
            })
            .collect())
    }

    async fn fetch_trading_fees(&self, params: &Params) -> CcxtResult<HashMap<String, TradingFee>> {
        let markets = self.load_markets(false).await?;
        let response = self.public_get("assets", "v4public", params).await?;
        let percent =
            |fee: &Value, key: &str| safe_decimal(fee, key).map(|rate| rate / Decimal::ONE_HUNDRED);

        Ok(markets
            .values()
            .map(|market| {
                let fee = safe_value(&response, market.base_id.as_str())
                    .cloned()
                    .unwrap_or(Value::Null);
                let trading_fee = TradingFee {
                    symbol: market.symbol.clone(),
                    maker: percent(&fee, "maker_fee"),
                    taker: percent(&fee, "taker_fee"),
                    percentage: Some(true),
                    tier_based: Some(false),
                    info: fee,
                };
                (market.symbol.clone(), trading_fee)
            })
            .collect())
    }

    async fn fetch_ticker(&self, symbol: &str, params: &Params) -> CcxtResult<Ticker> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        request.extend(params.clone());

        let response = self.public_get("ticker", "v1public", &request).await?;
        let ticker = safe_value(&response, "result").cloned().unwrap_or(Value::Null);
        Ok(self.parse_ticker(&ticker, &market.symbol))
    }

    async fn fetch_tickers(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<HashMap<String, Ticker>> {
        self.load_markets(false).await?;
        let response = self.public_get("ticker", "v4public", params).await?;
        let mut result = HashMap::new();
        if let Some(entries) = response.as_object() {
            for (market_id, data) in entries {
                let Some(symbol) = self.safe_symbol(Some(market_id), Some("_")) else {
                    continue;
                };
                if symbols.is_some_and(|wanted| !wanted.contains(&symbol.as_str())) {
                    continue;
                }
                result.insert(symbol.clone(), self.parse_ticker(data, &symbol));
            }
        }
        Ok(result)
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<OrderBook> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        if let Some(limit) = limit {
            request.insert("depth".into(), json!(limit));
        }
        request.extend(params.clone());

        let response = self.public_get("orderbook/{market}", "v4public", &request).await?;
        let empty = Vec::new();
        let bids = safe_list(&response, "bids").unwrap_or(&empty);
        let asks = safe_list(&response, "asks").unwrap_or(&empty);
        Ok(OrderBook::from_levels(&market.symbol, bids, asks, "price", "amount")
            .with_timestamp(safe_timestamp(&response, "timestamp")))
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<OHLCV>> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        request.insert("interval".into(), json!(self.descriptor.timeframe(timeframe)?));

        let limit = match since {
            Some(since) => {
                let limit = limit.unwrap_or(KLINE_MAX_LIMIT).min(KLINE_MAX_LIMIT);
                let start = since / 1000;
                request.insert("start".into(), json!(start));
                request.insert("end".into(), json!(start + timeframe.to_seconds() * limit as i64));
                Some(limit)
            },
            None => limit.map(|l| l.min(KLINE_MAX_LIMIT)),
        };
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit));
        }
        request.extend(params.clone());

        let response = self.public_get("kline", "v1public", &request).await?;
        let candles = safe_list(&response, "result")
            .map(|rows| rows.iter().filter_map(|row| self.parse_ohlcv(row)).collect())
            .unwrap_or_default();
        Ok(filter_by_since_limit(candles, since, limit))
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        request.extend(params.clone());

        let response = self.public_get("trades/{market}", "v4public", &request).await?;
        let mut trades: Vec<Trade> = response
            .as_array()
            .map(|rows| rows.iter().map(|t| self.parse_trade(t, Some(&market))).collect())
            .unwrap_or_default();
        sort_by_timestamp(&mut trades);
        Ok(filter_by_since_limit(trades, since, limit))
    }

    async fn fetch_balance(&self, params: &Params) -> CcxtResult<Balances> {
        self.load_markets(false).await?;
        let market_type = params
            .get("type")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| self.descriptor.option_str(self.config.options(), "defaultType"));
        let default_account = self
            .option("fetchBalance")
            .and_then(|v| safe_string(&v, "account"));
        let account = params
            .get("account")
            .and_then(Value::as_str)
            .map(String::from)
            .or(default_account);
        let request = omit(params, &["type", "account"]);

        let path = if market_type.as_deref() == Some("swap") {
            "collateral-account/balance"
        } else if account.as_deref() == Some("main") {
            "main-account/balance"
        } else {
            "trade-account/balance"
        };
        let response = self.private_post(path, &request).await?;
        Ok(self.parse_balance(&response))
    }

    async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
        params: &Params,
    ) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let query = Value::Object(params.clone());

        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        request.insert("side".into(), json!(side.as_str()));
        request.insert(
            "amount".into(),
            json!(amount_to_precision(amount, market.precision.amount)),
        );

        match safe_string2(&query, "clOrdId", "clientOrderId") {
            Some(client_order_id) => {
                request.insert("clientOrderId".into(), json!(client_order_id));
            },
            None => {
                if let Some(broker_id) = self.descriptor.option_str(self.config.options(), "brokerId") {
                    let mut suffix = uuid::Uuid::new_v4().simple().to_string();
                    suffix.truncate(16);
                    request.insert("clientOrderId".into(), json!(format!("{broker_id}{suffix}")));
                }
            },
        }

        let post_only = safe_bool(&query, "postOnly").unwrap_or(false)
            || safe_string(&query, "timeInForce").as_deref() == Some("PO");
        if post_only {
            if order_type == OrderType::Market {
                return Err(CcxtError::InvalidOrder {
                    message: "whitebit market orders cannot be postOnly".into(),
                });
            }
            request.insert("postOnly".into(), json!(true));
        }

        let margin_mode = safe_string(&query, "marginMode");
        if margin_mode.as_deref().is_some_and(|mode| mode != "cross") {
            return Err(CcxtError::not_supported(
                "whitebit createOrder() is only available for cross margin",
            ));
        }
        let use_collateral = margin_mode.is_some() || market.swap;

        let limit_price = || -> CcxtResult<String> {
            let price = price.ok_or_else(|| {
                CcxtError::arguments_required("whitebit createOrder() requires a price for limit orders")
            })?;
            Ok(price_to_precision(price, market.precision.price))
        };

        let trigger = safe_decimal_n(&query, &["triggerPrice", "stopPrice", "activation_price"]);
        let path = match (trigger, order_type) {
            (Some(trigger), order_type) => {
                request.insert(
                    "activation_price".into(),
                    json!(price_to_precision(trigger, market.precision.price)),
                );
                match order_type {
                    OrderType::Limit => {
                        request.insert("price".into(), json!(limit_price()?));
                        "order/stop_limit"
                    },
                    OrderType::Market if use_collateral => "order/collateral/trigger_market",
                    OrderType::Market => "order/stop_market",
                }
            },
            (None, OrderType::Limit) => {
                request.insert("price".into(), json!(limit_price()?));
                if use_collateral {
                    "order/collateral/limit"
                } else {
                    "order/new"
                }
            },
            (None, OrderType::Market) if use_collateral => "order/collateral/market",
            (None, OrderType::Market) => "order/stock_market",
        };

        request.extend(omit(
            params,
            &[
                "postOnly",
                "timeInForce",
                "triggerPrice",
                "stopPrice",
                "clOrdId",
                "clientOrderId",
                "marginMode",
            ],
        ));
        let response = self.private_post(path, &request).await?;
        Ok(self.parse_order(&response, Some(&market)))
    }

    async fn cancel_order(&self, id: &str, symbol: Option<&str>, params: &Params) -> CcxtResult<Order> {
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("whitebit cancelOrder() requires a symbol argument")
        })?;
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let order_id: i64 = id.parse().map_err(|_| CcxtError::BadRequest {
            message: format!("whitebit order id must be numeric: {id}"),
        })?;

        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        request.insert("orderId".into(), json!(order_id));
        request.extend(params.clone());

        let response = self.private_post("order/cancel", &request).await?;
        let mut order = self.parse_order(&response, Some(&market));
        order.status = Some(OrderStatus::Canceled);
        Ok(order)
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("whitebit fetchOpenOrders() requires a symbol argument")
        })?;
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("market".into(), json!(market.id));
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit.min(100)));
        }
        request.extend(params.clone());

        let response = self.private_post("orders", &request).await?;
        let orders: Vec<Order> = response
            .as_array()
            .map(|rows| {
                rows.iter()
                    .map(|o| Order {
                        status: Some(OrderStatus::Open),
                        ..self.parse_order(o, Some(&market))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(filter_by_since_limit(orders, since, limit))
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let mut request = Params::new();
        let market = symbol.map(|s| self.market(s)).transpose()?;
        if let Some(market) = &market {
            request.insert("market".into(), json!(market.id));
        }
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit.min(100)));
        }
        request.extend(params.clone());

        let response = self.private_post("trade-account/order/history", &request).await?;
        let mut orders = Vec::new();
        if let Some(by_market) = response.as_object() {
            for (market_id, rows) in by_market {
                let row_market = self.safe_market(Some(market_id), None, Some("_"));
                for row in rows.as_array().into_iter().flatten() {
                    orders.push(Order {
                        status: Some(OrderStatus::Closed),
                        ..self.parse_order(row, row_market.as_ref())
                    });
                }
            }
        }
        sort_by_timestamp(&mut orders);
        let symbol = market.map(|m| m.symbol);
        let orders = filter_by_symbol(orders, symbol.as_deref(), |o| o.symbol.as_deref());
        Ok(filter_by_since_limit(orders, since, limit))
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        self.load_markets(false).await?;
        let market = symbol.map(|s| self.market(s)).transpose()?;
        let mut request = Params::new();
        if let Some(market) = &market {
            request.insert("market".into(), json!(market.id));
        }
        request.extend(params.clone());

        let response = self.private_post("trade-account/executed-history", &request).await?;
        let mut trades: Vec<Trade> = match &response {
            Value::Array(rows) => rows.iter().map(|t| self.parse_trade(t, market.as_ref())).collect(),
            Value::Object(by_market) => by_market
                .iter()
                .flat_map(|(market_id, rows)| {
                    let row_market = self.safe_market(Some(market_id), None, Some("_"));
                    rows.as_array()
                        .into_iter()
                        .flatten()
                        .map(|t| self.parse_trade(t, row_market.as_ref()))
                        .collect::<Vec<_>>()
                })
                .collect(),
            _ => Vec::new(),
        };
        sort_by_timestamp(&mut trades);
        Ok(filter_by_since_limit(trades, since, limit))
    }

    async fn fetch_order_trades(
        &self,
        id: &str,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Trade>> {
        self.load_markets(false).await?;
        let order_id: i64 = id.parse().map_err(|_| CcxtError::BadRequest {
            message: format!("whitebit order id must be numeric: {id}"),
        })?;
        let market = symbol.map(|s| self.market(s)).transpose()?;
        let mut request = Params::new();
        request.insert("orderId".into(), json!(order_id));
        if let Some(market) = &market {
            request.insert("market".into(), json!(market.id));
        }
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit.min(100)));
        }
        request.extend(params.clone());

        let response = self.private_post("trade-account/order", &request).await?;
        let trades = safe_list(&response, "records")
            .map(|rows| rows.iter().map(|t| self.parse_trade(t, market.as_ref())).collect())
            .unwrap_or_default();
        Ok(filter_by_since_limit(trades, since, limit))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        self.fetch_history(1, code, since, limit, params).await
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        self.fetch_history(2, code, since, limit, params).await
    }

    async fn fetch_deposit(&self, id: &str, code: Option<&str>, params: &Params) -> CcxtResult<Transaction> {
        self.load_markets(false).await?;
        let mut request = Params::new();
        request.insert("transactionMethod".into(), json!(1));
        request.insert("uniqueId".into(), json!(id));
        request.insert("limit".into(), json!(1));
        request.insert("offset".into(), json!(0));
        if let Some(code) = code {
            request.insert("ticker".into(), json!(self.currency(code)?.id));
        }
        request.extend(params.clone());

        let response = self.private_post("main-account/history", &request).await?;
        let record = safe_list(&response, "records")
            .and_then(|records| records.first())
            .ok_or_else(|| CcxtError::ExchangeError {
                message: format!("whitebit deposit {id} not found"),
            })?;
        Ok(self.parse_transaction(record, code))
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
        params: &Params,
    ) -> CcxtResult<Transaction> {
        self.load_markets(false).await?;
        let currency = self.currency(code)?;
        let unique_id = params
            .get("uniqueId")
            .map(param_to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

        let mut request = Params::new();
        request.insert("ticker".into(), json!(currency.id));
        request.insert(
            "amount".into(),
            json!(amount_to_precision(amount, currency.precision)),
        );
        request.insert("address".into(), json!(address));
        request.insert("uniqueId".into(), json!(unique_id));
        if let Some(tag) = tag {
            request.insert("memo".into(), json!(tag));
        }
        if self.is_fiat(code) && !params.contains_key("provider") {
            return Err(CcxtError::arguments_required(
                "whitebit withdraw() requires a provider when the ticker is fiat",
            ));
        }
        request.extend(params.clone());

        let response = self.private_post("main-account/withdraw", &request).await?;
        let mut transaction = self.parse_transaction(&response, Some(code));
        transaction.id = Some(unique_id);
        transaction.tx_type = Some(TransactionType::Withdrawal);
        transaction.currency = Some(currency.code);
        transaction.amount = transaction.amount.or(Some(amount));
        transaction.address = transaction.address.or_else(|| Some(address.to_string()));
        transaction.address_to = transaction.address.clone();
        transaction.tag = tag.map(String::from);
        Ok(transaction)
    }

    async fn fetch_deposit_address(&self, code: &str, params: &Params) -> CcxtResult<DepositAddress> {
        self.load_markets(false).await?;
        let currency = self.currency(code)?;
        let mut request = Params::new();
        request.insert("ticker".into(), json!(currency.id));

        let path = if self.is_fiat(code) {
            for required in ["provider", "amount", "uniqueId"] {
                if !params.contains_key(required) {
                    return Err(CcxtError::arguments_required(format!(
                        "whitebit fetchDepositAddress() requires {required} when the ticker is fiat"
                    )));
                }
            }
            "main-account/fiat-deposit-url"
        } else {
            "main-account/address"
        };
        request.extend(params.clone());

        let response = self.private_post(path, &request).await?;
        let account = safe_value(&response, "account").cloned().unwrap_or(Value::Null);
        let address = safe_string(&account, "address")
            .or_else(|| safe_string(&response, "url"))
            .ok_or_else(|| CcxtError::InvalidAddress {
                message: format!("whitebit returned no deposit address for {code}"),
            })?;

        Ok(DepositAddress {
            currency: code.to_string(),
            network: params.get("network").and_then(Value::as_str).map(String::from),
            address,
            tag: safe_string(&account, "memo"),
            info: response,
        })
    }

    async fn transfer(
        &self,
        code: &str,
        amount: Decimal,
        from_account: &str,
        to_account: &str,
        params: &Params,
    ) -> CcxtResult<TransferEntry> {
        self.load_markets(false).await?;
        let currency = self.currency(code)?;
        let accounts = self.option("accountsByType").unwrap_or(Value::Null);
        let account_id = |name: &str| safe_string(&accounts, name).unwrap_or_else(|| name.to_string());
        let from_id = account_id(from_account);
        let to_id = account_id(to_account);

        let mut request = Params::new();
        request.insert("ticker".into(), json!(currency.id));
        request.insert(
            "amount".into(),
            json!(amount_to_precision(amount, currency.precision)),
        );
        request.insert("from".into(), json!(from_id));
        request.insert("to".into(), json!(to_id));
        request.extend(params.clone());

        let response = self.private_post("main-account/transfer", &request).await?;
        Ok(TransferEntry {
            currency: Some(currency.code),
            amount: Some(amount),
            from_account: Some(from_id),
            to_account: Some(to_id),
            info: response,
            ..Default::default()
        })
    }

    async fn fetch_positions(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<Vec<Position>> {
        self.load_markets(false).await?;
        let mut request = Params::new();
        let single = match symbols {
            Some([symbol]) => Some(self.market(symbol)?),
            _ => None,
        };
        if let Some(market) = &single {
            request.insert("market".into(), json!(market.id));
        }
        request.extend(params.clone());

        let response = self
            .private_post("collateral-account/positions/open", &request)
            .await?;
        let positions = response
            .as_array()
            .map(|rows| rows.iter().map(|p| self.parse_position(p, single.as_ref())).collect())
            .unwrap_or_else(Vec::new);
        Ok(match symbols {
            Some(wanted) => positions
                .into_iter()
                .filter(|p: &Position| wanted.contains(&p.symbol.as_str()))
                .collect(),
            None => positions,
        })
    }

    fn sign(&self, path: &str, api: &str, method: &str, params: &Params) -> CcxtResult<SignedRequest> {
        let (path_with_params, query) = implode_params(path, params);
        let base = self.descriptor.api_url(api, &self.config)?;
        let url = format!("{base}/{path_with_params}");

        if !api.ends_with("private") {
            return Ok(SignedRequest {
                url: with_query(&url, &query),
                method: method.to_string(),
                ..Default::default()
            });
        }

        let credentials = Credentials::require(&self.config, self.descriptor.id.as_str())?;
        let version = api.trim_end_matches("private");
        let mut payload = params.clone();
        payload.insert("request".into(), json!(format!("/api/{version}/{path_with_params}")));
        payload.insert("nonce".into(), json!(self.next_nonce().to_string()));
        let body = serde_json::to_string(&payload)?;
        let encoded = base64_encode(body.as_bytes());
        let signature = SigningScheme::HmacSha512Payload.signature(&credentials, &encoded)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".into(), "application/json".into());
        headers.insert("X-TXC-APIKEY".into(), credentials.api_key.to_string());
        headers.insert("X-TXC-PAYLOAD".into(), encoded);
        headers.insert("X-TXC-SIGNATURE".into(), signature);

        Ok(SignedRequest {
            url,
            method: method.to_string(),
            headers,
            body: Some(body),
        })
    }
}
