//! WOO X Exchange Implementation
//!
//! WOO X 거래소 API 구현. v1은 form 인코딩 서명, v3는 JSON 본문 서명.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::client::{
    implode_params, omit, paginate_offset, parse_json, take_paginate, urlencode, with_query,
    ExchangeConfig, HttpClient, MarketCache, RateLimiter,
};
use crate::crypto::{Credentials, SigningScheme};
use crate::errors::{CcxtError, CcxtResult, ErrorKind, RequestContext};
use crate::types::{
    Account, Balance, Balances, Currency, CurrencyNetwork, DepositAddress, Exchange,
    ExchangeDescriptor, ExchangeId, ExchangeUrls, Fee, FeeSchedule, LedgerDirection, LedgerEntry,
    MarginMode, Market, MinMax, Order, OrderBook, OrderSide, OrderStatus, OrderType, Params,
    Position, SignedRequest, TakerOrMaker, TimeInForce, Timeframe, Trade, TradingFee, Transaction,
    TransactionStatus, TransactionType, TransferEntry, OHLCV,
};
use crate::utils::precise::{string_div, string_mul, string_sub};
use crate::utils::{
    amount_to_precision, cost_to_precision, filter_by_since_limit, iso8601, now_ms, parse_decimal,
    precision_from_digits, price_to_precision, safe_bool, safe_decimal, safe_decimal_n,
    safe_integer, safe_list, safe_string, safe_string2, safe_string_lower, safe_string_n,
    safe_string_upper, safe_timestamp, safe_value, sort_by_timestamp,
};

const RATE_LIMIT_MS: u64 = 100;
const BROKER_ID: &str = "bc830de7-50f3-460b-9ee0-f430f83f9dad";
const ORDERS_PAGE_SIZE: u32 = 500;

/// WOO X 거래소
pub struct Woo {
    config: ExchangeConfig,
    descriptor: ExchangeDescriptor,
    client: HttpClient,
    rate_limiter: RateLimiter,
    cache: MarketCache,
}

impl Woo {
    /// 새 WOO X 인스턴스 생성
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
        })
    }

    fn describe() -> ExchangeDescriptor {
        let mut descriptor = ExchangeDescriptor::new(ExchangeId::Woo, "WOO X", "v1");
        descriptor.rate_limit_ms = RATE_LIMIT_MS;
        descriptor.features = feature_flags! {
            spot, margin, swap,
            fetch_markets, fetch_currencies, fetch_order_book, fetch_trades, fetch_ohlcv,
            fetch_trading_fees,
            fetch_accounts, fetch_balance,
            create_order, edit_order, cancel_order, cancel_all_orders,
            fetch_order, fetch_orders, fetch_open_orders, fetch_closed_orders,
            fetch_my_trades, fetch_order_trades,
            fetch_ledger, fetch_deposits, fetch_withdrawals, fetch_transactions,
            fetch_deposit_address, withdraw, transfer, fetch_transfers,
            fetch_position, fetch_positions,
        };
        descriptor.urls = ExchangeUrls {
            api: api_urls! {
                "v1pub" => "https://api-pub.woo.org/v1",
                "v1public" => "https://api.{hostname}/v1/public",
                "v1private" => "https://api.{hostname}/v1",
                "v3public" => "https://api.{hostname}/v3/public",
                "v3private" => "https://api.{hostname}/v3",
            },
            test: api_urls! {
                "v1pub" => "https://api-pub.staging.woo.org/v1",
                "v1public" => "https://api.staging.woo.org/v1/public",
                "v1private" => "https://api.staging.woo.org/v1",
                "v3public" => "https://api.staging.woo.org/v3/public",
                "v3private" => "https://api.staging.woo.org/v3",
            },
            www: Some("https://woo.org/".into()),
            doc: vec!["https://docs.woo.org/".into()],
            fees: Some(
                "https://support.woo.org/hc/en-001/articles/4404611795353--Trading-Fees".into(),
            ),
        };
        descriptor.endpoint_costs = endpoint_costs! {
            "v1private GET asset/deposit" => 10.0,
            "v1private GET asset/history" => 60.0,
            "v1private GET sub_account/assets" => 60.0,
            "v1private GET position/{symbol}" => 3.33,
            "v1private POST order" => 5.0,
            "v1private POST asset/main_sub_transfer" => 30.0,
            "v1private POST asset/withdraw" => 30.0,
            "v3private GET accountinfo" => 60.0,
            "v3private GET positions" => 3.33,
            "v3private POST algo/order" => 5.0,
            "v3private PUT order/{oid}" => 2.0,
            "v3private PUT order/client/{client_order_id}" => 2.0,
            "v3private PUT algo/order/{oid}" => 2.0,
            "v3private PUT algo/order/client/{client_order_id}" => 2.0,
        };
        descriptor.timeframes = timeframe_map! {
            Minute1 => "1m",
            Minute5 => "5m",
            Minute15 => "15m",
            Minute30 => "30m",
            Hour1 => "1h",
            Hour4 => "4h",
            Hour12 => "12h",
            Day1 => "1d",
            Week1 => "1w",
            Month1 => "1mon",
        };
        descriptor.fees = FeeSchedule::flat(Decimal::new(5, 4), Decimal::new(2, 4));
        descriptor.options = json!({
            "hostname": "woo.org",
            "brokerId": BROKER_ID,
            "createMarketBuyOrderRequiresPrice": true,
            "networks": {
                "TRX": "TRON",
                "TRC20": "TRON",
                "ERC20": "ETH",
                "BEP20": "BSC",
            },
            "transfer": { "fillResponseFromRequest": true },
        });
        descriptor.exceptions = exception_table! {
            exact: {
                "-1000" => ExchangeError,
                "-1001" => AuthenticationError,
                "-1002" => AuthenticationError,
                "-1003" => RateLimitExceeded,
                "-1004" => BadRequest,
                "-1005" => BadRequest,
                "-1006" => BadRequest,
                "-1007" => BadRequest,
                "-1008" => InvalidOrder,
                "-1009" => BadRequest,
                "-1011" => ExchangeError,
                "-1012" => BadRequest,
                "-1101" => InvalidOrder,
                "-1102" => InvalidOrder,
                "-1103" => InvalidOrder,
                "-1104" => InvalidOrder,
                "-1105" => InvalidOrder,
            },
            broad: {
                "symbol must not be blank" => BadRequest,
                "The token is not supported" => BadRequest,
                "Your order and symbol are not valid or already canceled" => BadRequest,
                "Insufficient WOO. Please enable margin trading for leverage trading" => BadRequest,
            },
        };
        descriptor
    }

    fn option(&self, key: &str) -> Option<Value> {
        self.descriptor.option(self.config.options(), key)
    }

    async fn request(&self, path: &str, api: &str, method: &str, params: &Params) -> CcxtResult<Value> {
        self.rate_limiter
            .throttle(self.descriptor.cost(api, method, path))
            .await;
        let signed = self.sign(path, api, method, params)?;
        tracing::debug!(exchange = "woo", method = %signed.method, url = %signed.url, "request");

        let (status, body) = self.client.execute(&signed).await?;
        let context = RequestContext::new(self.descriptor.id.as_str(), &signed.method, &signed.url);
        self.handle_errors(status, &context, &body)?;
        parse_json(&body)
    }

    async fn public_get(&self, path: &str, params: &Params) -> CcxtResult<Value> {
        self.request(path, "v1public", "GET", params).await
    }

    /// 벤더 오류 → 통합 오류 (broad가 exact보다 먼저)
    fn handle_errors(&self, status: u16, context: &RequestContext, body: &str) -> CcxtResult<()> {
        let feedback = context.feedback(body);
        let response = match serde_json::from_str::<Value>(body) {
            Ok(response) => response,
            Err(_) if status >= 400 => return Err(CcxtError::ExchangeError { message: feedback }),
            Err(_) => return Ok(()),
        };

        let failed = safe_bool(&response, "success") == Some(false);
        if !failed && status < 400 {
            return Ok(());
        }

        let code = safe_string(&response, "code");
        tracing::warn!(exchange = "woo", status, code = ?code, "vendor error");
        let exceptions = &self.descriptor.exceptions;
        exceptions.throw_broadly_matched(Some(body), &feedback)?;
        exceptions.throw_exactly_matched(code.as_deref(), &feedback)?;
        if status == 429 {
            return Err(ErrorKind::RateLimitExceeded.with_message(feedback));
        }
        Err(CcxtError::ExchangeError { message: feedback })
    }

    /// 초 단위(소수 포함)와 밀리초 단위가 섞여 오는 시각
    fn parse_time(data: &Value, keys: &[&str]) -> Option<i64> {
        let value = safe_decimal_n(data, keys)?;
        let millis = if value < Decimal::from(10_000_000_000i64) {
            value * Decimal::from(1000)
        } else {
            value
        };
        i64::try_from(millis.trunc()).ok()
    }

    /// `NETWORK_TOKEN` 형식의 토큰 ID → 통합 화폐 코드
    fn currency_from_chain_code(&self, token: Option<&str>, code: Option<&str>) -> Option<String> {
        if let Some(code) = code {
            return Some(code.to_string());
        }
        let parts: Vec<&str> = token?.split('_').collect();
        let currency_id = match parts.as_slice() {
            [only] => only.to_string(),
            [_, id] => id.to_string(),
            [_, id, rest @ ..] => format!("{id}_{}", rest.join("_")),
            [] => return None,
        };
        self.safe_currency_code(Some(&currency_id))
    }

    /// 캐시에 없으면 `SPOT_`/`PERP_` ID 구조로 마켓을 만든다
    fn market_symbol(&self, market_id: Option<&str>, market: Option<&Market>) -> (Option<Market>, Option<String>) {
        let market = self
            .safe_market(market_id, market, None)
            .or_else(|| market_id.and_then(|id| self.parse_market(&json!({ "symbol": id }))));
        let symbol = market
            .as_ref()
            .map(|m| m.symbol.clone())
            .or_else(|| market_id.map(String::from));
        (market, symbol)
    }

    fn status_label(status: TransactionStatus) -> &'static str {
        match status {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Ok => "ok",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Canceled => "canceled",
        }
    }

    /// `"0.5"` (%) → `"0.005"`
    fn callback_rate(percent: Option<&str>) -> Option<String> {
        string_div(percent, Some("100"))
    }

    // === 파서 ===

    fn parse_market(&self, data: &Value) -> Option<Market> {
        let id = safe_string(data, "symbol")?;
        let parts: Vec<&str> = id.split('_').collect();
        let [kind, base_id, quote_id] = parts.as_slice() else {
            return None;
        };
        let base = self.descriptor.safe_currency_code(base_id);
        let quote = self.descriptor.safe_currency_code(quote_id);

        let mut market = match *kind {
            "SPOT" => {
                let mut market = Market::spot(id.clone(), &base, &quote);
                market.margin = true;
                market
            },
            "PERP" => Market::linear_swap(id.clone(), &base, &quote),
            _ => return None,
        };
        market.base_id = base_id.to_string();
        market.quote_id = quote_id.to_string();
        if market.swap {
            market.settle_id = Some(quote_id.to_string());
        }
        market.active = None;
        market.precision.amount = safe_decimal(data, "base_tick");
        market.precision.price = safe_decimal(data, "quote_tick");
        market.limits.amount = MinMax::new(safe_decimal(data, "base_min"), safe_decimal(data, "base_max"));
        market.limits.price = MinMax::new(safe_decimal(data, "quote_min"), safe_decimal(data, "quote_max"));
        market.limits.cost = MinMax::new(safe_decimal(data, "min_notional"), None);
        market.created = safe_timestamp(data, "created_time");
        market.info = data.clone();
        Some(market)
    }

    /// `balance_token`별로 묶인 토큰 목록 → 화폐
    fn parse_currency(&self, currency_id: &str, rows: &[&Value]) -> Currency {
        let mut networks = HashMap::new();
        let mut name = None;
        let mut min_precision: Option<Decimal> = None;

        for row in rows {
            name = safe_string(row, "fullname").or(name);
            let Some(network_id) = safe_string(row, "token") else {
                continue;
            };
            let network = network_id
                .split('_')
                .next()
                .unwrap_or(network_id.as_str())
                .to_string();
            let precision = safe_integer(row, "decimals").map(|d| precision_from_digits(d as i32));
            if let Some(precision) = precision {
                min_precision = Some(min_precision.map_or(precision, |p| p.min(precision)));
            }
            networks.insert(
                network.clone(),
                CurrencyNetwork {
                    id: network_id,
                    network,
                    precision,
                    info: (*row).clone(),
                    ..Default::default()
                },
            );
        }

        Currency {
            id: currency_id.to_string(),
            code: self.descriptor.safe_currency_code(currency_id),
            name,
            precision: min_precision,
            networks,
            info: Value::Array(rows.iter().map(|r| (*r).clone()).collect()),
            ..Default::default()
        }
    }

    fn parse_fee(data: &Value, token_key: &str, amount_key: &str, code: Option<String>) -> Option<Fee> {
        let cost = safe_decimal(data, amount_key)?;
        Some(Fee::new(Some(cost), code.or_else(|| safe_string(data, token_key))))
    }

    fn parse_trade(&self, data: &Value, market: Option<&Market>) -> Trade {
        let (_, symbol) = self.market_symbol(safe_string(data, "symbol").as_deref(), market);
        let fee_code = self.safe_currency_code(safe_string(data, "fee_asset").as_deref());

        // 주문 체결 조회에서만 `id`와 `is_maker`가 온다
        let taker_or_maker = data.get("id").map(|_| {
            if safe_string(data, "is_maker").as_deref() == Some("1") {
                TakerOrMaker::Maker
            } else {
                TakerOrMaker::Taker
            }
        });

        Trade {
            id: safe_string(data, "id"),
            order: safe_string(data, "order_id"),
            timestamp: safe_timestamp(data, "executed_timestamp"),
            symbol,
            side: safe_string(data, "side").and_then(|s| OrderSide::parse(&s)),
            taker_or_maker,
            price: safe_decimal(data, "executed_price"),
            amount: safe_decimal(data, "executed_quantity"),
            fee: Self::parse_fee(data, "fee_asset", "fee", fee_code),
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_order_status(status: &str) -> Option<OrderStatus> {
        match status {
            "NEW" | "PARTIAL_FILLED" | "INCOMPLETE" => Some(OrderStatus::Open),
            "FILLED" | "COMPLETED" => Some(OrderStatus::Closed),
            "CANCEL_SENT" | "CANCEL_ALL_SENT" | "CANCELLED" => Some(OrderStatus::Canceled),
            "REJECTED" => Some(OrderStatus::Rejected),
            _ => None,
        }
    }

    fn parse_order(&self, data: &Value, market: Option<&Market>) -> Order {
        let (_, symbol) = self.market_symbol(safe_string(data, "symbol").as_deref(), market);
        let order_type = safe_string_lower(data, "order_type").or_else(|| safe_string_lower(data, "type"));
        let time_in_force = match order_type.as_deref() {
            Some("ioc") => Some(TimeInForce::IOC),
            Some("fok") => Some(TimeInForce::FOK),
            Some("post_only") => Some(TimeInForce::PO),
            _ => None,
        };
        let is_zero = |d: &Decimal| d.is_zero();

        let fee_code = self.safe_currency_code(safe_string2(data, "fee_asset", "feeAsset").as_deref());
        let fee = safe_decimal_n(data, &["total_fee", "totalFee"]).map(|cost| Fee::new(Some(cost), fee_code));

        let (take_profit_price, stop_loss_price) = safe_list(data, "childOrders")
            .and_then(|children| children.first())
            .and_then(|outer| safe_list(outer, "childOrders"))
            .map(|inner| {
                (
                    inner.first().and_then(|o| safe_decimal(o, "triggerPrice")),
                    inner.get(1).and_then(|o| safe_decimal(o, "triggerPrice")),
                )
            })
            .unwrap_or((None, None));

        Order {
            id: safe_string_n(data, &["order_id", "orderId", "algoOrderId"]).unwrap_or_default(),
            // 지정가 주문은 client_order_id가 0으로 온다
            client_order_id: safe_string2(data, "client_order_id", "clientOrderId").filter(|id| id != "0"),
            timestamp: Self::parse_time(data, &["timestamp", "created_time", "createdTime"]),
            last_update_timestamp: Self::parse_time(data, &["updatedTime", "updated_time"]),
            status: safe_string2(data, "status", "algoStatus")
                .as_deref()
                .and_then(Self::parse_order_status),
            symbol,
            order_type: order_type.as_deref().map(|t| {
                if t == "market" {
                    OrderType::Market
                } else {
                    OrderType::Limit
                }
            }),
            time_in_force,
            post_only: time_in_force.map(|tif| tif == TimeInForce::PO),
            reduce_only: safe_bool(data, "reduce_only"),
            side: safe_string(data, "side").and_then(|s| OrderSide::parse(&s)),
            price: safe_decimal_n(data, &["order_price", "price"]).filter(|p| !is_zero(p)),
            trigger_price: safe_decimal(data, "triggerPrice"),
            take_profit_price,
            stop_loss_price,
            average: safe_decimal_n(data, &["average_executed_price", "averageExecutedPrice"])
                .filter(|p| !is_zero(p)),
            amount: safe_decimal_n(data, &["order_quantity", "quantity"]),
            filled: safe_decimal_n(data, &["executed", "totalExecutedQuantity"]),
            cost: safe_decimal_n(data, &["order_amount", "amount"]),
            fee,
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_ohlcv(row: &Value) -> Option<OHLCV> {
        Some(OHLCV::new(
            safe_integer(row, "start_timestamp")?,
            safe_decimal(row, "open"),
            safe_decimal(row, "high"),
            safe_decimal(row, "low"),
            safe_decimal(row, "close"),
            safe_decimal(row, "volume"),
        ))
    }

    fn parse_balance(&self, data: &Value) -> Balances {
        let mut balances = Balances::new(data.clone());
        for entry in safe_list(data, "holding").into_iter().flatten() {
            let Some(code) = self.safe_currency_code(safe_string(entry, "token").as_deref()) else {
                continue;
            };
            balances.add(
                code,
                Balance::new(
                    safe_decimal(entry, "availableBalance"),
                    None,
                    safe_decimal(entry, "holding"),
                ),
            );
        }
        balances.safe_balance()
    }

    fn parse_account(data: &Value) -> Account {
        let name = safe_string(data, "account");
        Account {
            id: safe_string(data, "application_id"),
            account_type: Some(if name.as_deref() == Some("Main") {
                "main".into()
            } else {
                "subaccount".into()
            }),
            code: None,
            info: data.clone(),
        }
    }

    fn parse_transaction_status(status: &str) -> Option<TransactionStatus> {
        match status {
            "NEW" | "CONFIRMING" | "PROCESSING" => Some(TransactionStatus::Pending),
            "COMPLETED" => Some(TransactionStatus::Ok),
            "CANCELED" => Some(TransactionStatus::Canceled),
            "FAILED" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    fn parse_transaction(&self, data: &Value, code: Option<&str>) -> Transaction {
        let currency = self.currency_from_chain_code(safe_string(data, "token").as_deref(), code);
        let tx_type = safe_string_upper(data, "token_side").and_then(|side| match side.as_str() {
            "DEPOSIT" => Some(TransactionType::Deposit),
            "WITHDRAW" => Some(TransactionType::Withdrawal),
            _ => None,
        });
        let fee_code = self.safe_currency_code(safe_string(data, "fee_token").as_deref());

        Transaction {
            id: safe_string2(data, "id", "withdraw_id"),
            txid: safe_string(data, "tx_id"),
            timestamp: safe_timestamp(data, "created_time"),
            updated: safe_timestamp(data, "updated_time"),
            tx_type,
            currency,
            amount: safe_decimal(data, "amount"),
            status: safe_string(data, "status")
                .as_deref()
                .and_then(Self::parse_transaction_status),
            address_from: safe_string(data, "source_address"),
            address_to: safe_string(data, "target_address"),
            tag: safe_string(data, "extra"),
            fee: Self::parse_fee(data, "fee_token", "fee_amount", fee_code),
            info: data.clone(),
            ..Default::default()
        }
        .complete()
    }

    fn parse_ledger_entry(&self, data: &Value, code: Option<&str>) -> LedgerEntry {
        let timestamp = safe_timestamp(data, "created_time");
        let fee_code = self.safe_currency_code(safe_string(data, "fee_token").as_deref());
        let status = safe_string(data, "status")
            .as_deref()
            .and_then(Self::parse_transaction_status)
            .map(|status| Self::status_label(status).to_string());
        let entry_type = safe_string(data, "type").map(|t| match t.as_str() {
            "BALANCE" => "transaction".to_string(),
            "COLLATERAL" => "transfer".to_string(),
            _ => t,
        });

        LedgerEntry {
            id: safe_string(data, "id"),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            direction: Some(if safe_string(data, "token_side").as_deref() == Some("DEPOSIT") {
                LedgerDirection::In
            } else {
                LedgerDirection::Out
            }),
            account: safe_string(data, "account"),
            reference_id: safe_string(data, "tx_id"),
            entry_type,
            currency: self.currency_from_chain_code(safe_string(data, "token").as_deref(), code),
            amount: safe_decimal(data, "amount"),
            status,
            fee: Self::parse_fee(data, "fee_token", "fee_amount", fee_code),
            info: data.clone(),
            ..Default::default()
        }
    }

    fn parse_transfer(&self, data: &Value, code: Option<&str>) -> TransferEntry {
        let timestamp = safe_timestamp(data, "created_time");
        let (from_account, to_account) = match safe_string_upper(data, "token_side").as_deref() {
            Some("DEPOSIT") => (Some("spot".to_string()), None),
            Some("WITHDRAW") => (None, Some("spot".to_string())),
            _ => (None, None),
        };
        let status = match safe_string(data, "status") {
            Some(status) => Self::parse_transaction_status(&status)
                .map(|s| Self::status_label(s).to_string())
                .or(Some(status)),
            None => safe_bool(data, "success").map(|ok| if ok { "ok" } else { "failed" }.to_string()),
        };

        TransferEntry {
            id: safe_string(data, "id"),
            timestamp,
            datetime: timestamp.and_then(iso8601),
            currency: self.currency_from_chain_code(safe_string(data, "token").as_deref(), code),
            amount: safe_decimal(data, "amount"),
            from_account,
            to_account,
            status,
            info: data.clone(),
        }
    }

    fn parse_position(&self, data: &Value, market: Option<&Market>) -> Position {
        let (market, symbol) = self.market_symbol(safe_string(data, "symbol").as_deref(), market);
        let holding = safe_string(data, "holding");
        let mark_price = safe_string(data, "markPrice");
        let entry_price = safe_string(data, "averageOpenPrice");
        let unrealized_pnl = string_mul(
            string_sub(mark_price.as_deref(), entry_price.as_deref()).as_deref(),
            holding.as_deref(),
        );

        Position {
            symbol: symbol.unwrap_or_default(),
            timestamp: Self::parse_time(data, &["timestamp"]),
            contract_size: market.and_then(|m| m.contract_size),
            entry_price: entry_price.as_deref().and_then(parse_decimal),
            mark_price: mark_price.as_deref().and_then(parse_decimal),
            unrealized_pnl: unrealized_pnl.as_deref().and_then(parse_decimal),
            liquidation_price: safe_decimal(data, "estLiqPrice"),
            margin_mode: Some(MarginMode::Cross),
            info: data.clone(),
            ..Default::default()
        }
        .with_signed_size(holding.as_deref().and_then(parse_decimal))
        .complete()
    }

    /// `asset/history` 행 조회
    async fn asset_history(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Value>> {
        self.load_markets(false).await?;
        let mut request = Params::new();
        if let Some(code) = code {
            request.insert("balance_token".into(), json!(self.currency(code)?.id));
        }
        if let Some(since) = since {
            request.insert("start_t".into(), json!(since));
        }
        if let Some(limit) = limit {
            request.insert("pageSize".into(), json!(limit));
        }
        request.extend(params.clone());

        let response = self
            .request("asset/history", "v1private", "GET", &request)
            .await?;
        Ok(safe_list(&response, "rows").cloned().unwrap_or_default())
    }

    /// v1 `orders` 조회 (status 필터, page 단위 페이지네이션)
    async fn fetch_orders_with_status(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
        status: Option<&str>,
    ) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let (paginate, rest) = take_paginate(params);
        let query = Value::Object(rest.clone());
        let stop = safe_bool(&query, "stop").or(safe_bool(&query, "trigger")).unwrap_or(false);
        let trailing = safe_bool(&query, "trailing").unwrap_or(false);
        let rest = omit(&rest, &["stop", "trigger", "trailing"]);

        let market = symbol.map(|s| self.market(s)).transpose()?;
        let mut request = Params::new();
        if let Some(market) = &market {
            request.insert("symbol".into(), json!(market.id));
        }
        let is_algo = stop || trailing;
        if let Some(since) = since {
            let key = if is_algo { "createdTimeStart" } else { "start_t" };
            request.insert(key.into(), json!(since));
        }
        if stop {
            request.insert("algoType".into(), json!("stop"));
        } else if trailing {
            request.insert("algoType".into(), json!("TRAILING_STOP"));
        }
        if let Some(status) = status {
            request.insert("status".into(), json!(status));
        }
        request.extend(rest);

        let (path, api) = if is_algo {
            ("algo/orders", "v3private")
        } else {
            ("orders", "v1private")
        };
        let fetch_page = |offset: u32| {
            let mut page_request = request.clone();
            if paginate {
                page_request.insert("page".into(), json!(offset / ORDERS_PAGE_SIZE + 1));
                page_request.insert("size".into(), json!(ORDERS_PAGE_SIZE));
            }
            let market = market.as_ref();
            async move {
                let response = self.request(path, api, "GET", &page_request).await?;
                let data = safe_value(&response, "data").unwrap_or(&response);
                let orders = safe_list(data, "rows")
                    .map(|rows| rows.iter().map(|o| self.parse_order(o, market)).collect())
                    .unwrap_or_default();
                Ok::<Vec<Order>, CcxtError>(orders)
            }
        };

        let mut orders = if paginate {
            paginate_offset(self.config.max_pages(), ORDERS_PAGE_SIZE, fetch_page).await?
        } else {
            fetch_page(0).await?
        };
        sort_by_timestamp(&mut orders);
        Ok(filter_by_since_limit(orders, since, limit))
    }

    /// 거래소가 주는 네트워크 중 기본값 (ETH 우선)
    fn default_network(currency: &Currency) -> Option<String> {
        if currency.networks.contains_key("ETH") {
            return Some("ETH".into());
        }
        let mut keys: Vec<&String> = currency.networks.keys().collect();
        keys.sort();
        keys.first().map(|k| k.to_string())
    }
}

#[async_trait]
impl Exchange for Woo {
    fn descriptor(&self) -> &ExchangeDescriptor {
        &self.descriptor
    }

    fn cache(&self) -> &MarketCache {
        &self.cache
    }

    async fn fetch_markets(&self, params: &Params) -> CcxtResult<Vec<Market>> {
        let response = self.public_get("info", params).await?;
        Ok(safe_list(&response, "rows")
            .map(|rows| rows.iter().filter_map(|m| self.parse_market(m)).collect())
            .unwrap_or_default())
    }

    async fn fetch_currencies(&self, params: &Params) -> CcxtResult<HashMap<String, Currency>> {
        let response = self.public_get("token", params).await?;
        let mut grouped: HashMap<String, Vec<&Value>> = HashMap::new();
        for row in safe_list(&response, "rows").into_iter().flatten() {
            if let Some(currency_id) = safe_string(row, "balance_token") {
                grouped.entry(currency_id).or_default().push(row);
            }
        }
        Ok(grouped
            .iter()
            .map(|(currency_id, rows)| {
                let currency = self.parse_currency(currency_id, rows);
                (currency.code.clone(), currency)
            })
            .collect())
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
        request.insert("symbol".into(), json!(market.id));
        if let Some(limit) = limit {
            request.insert("max_level".into(), json!(limit.min(1000)));
        }
        request.extend(params.clone());

        let response = self.public_get("orderbook/{symbol}", &request).await?;
        let empty = Vec::new();
        let bids = safe_list(&response, "bids").unwrap_or(&empty);
        let asks = safe_list(&response, "asks").unwrap_or(&empty);
        Ok(OrderBook::from_levels(&market.symbol, bids, asks, "price", "quantity")
            .with_timestamp(safe_integer(&response, "timestamp")))
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
        request.insert("symbol".into(), json!(market.id));
        request.insert("type".into(), json!(self.descriptor.timeframe(timeframe)?));
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit.min(1000)));
        }
        request.extend(params.clone());

        let response = self.public_get("kline", &request).await?;
        let mut candles: Vec<OHLCV> = safe_list(&response, "rows")
            .map(|rows| rows.iter().filter_map(Self::parse_ohlcv).collect())
            .unwrap_or_default();
        sort_by_timestamp(&mut candles);
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
        request.insert("symbol".into(), json!(market.id));
        if let Some(limit) = limit {
            request.insert("limit".into(), json!(limit));
        }
        request.extend(params.clone());

        let response = self.public_get("market_trades", &request).await?;
        let mut trades: Vec<Trade> = safe_list(&response, "rows")
            .map(|rows| rows.iter().map(|t| self.parse_trade(t, Some(&market))).collect())
            .unwrap_or_default();
        sort_by_timestamp(&mut trades);
        Ok(filter_by_since_limit(trades, since, limit))
    }

    async fn fetch_trading_fees(&self, params: &Params) -> CcxtResult<HashMap<String, TradingFee>> {
        let markets = self.load_markets(false).await?;
        let response = self
            .request("accountinfo", "v3private", "GET", params)
            .await?;
        let data = safe_value(&response, "data").cloned().unwrap_or(Value::Null);
        // 계정 단위 수수료율 (basis point)
        let bps = |key: &str| safe_decimal(&data, key).map(|rate| rate / Decimal::from(10_000));
        let maker = bps("makerFeeRate");
        let taker = bps("takerFeeRate");

        Ok(markets
            .keys()
            .map(|symbol| {
                let fee = TradingFee {
                    symbol: symbol.clone(),
                    maker,
                    taker,
                    percentage: Some(true),
                    tier_based: Some(true),
                    info: response.clone(),
                };
                (symbol.clone(), fee)
            })
            .collect())
    }

    async fn fetch_accounts(&self, params: &Params) -> CcxtResult<Vec<Account>> {
        let response = self
            .request("sub_account/assets", "v1private", "GET", params)
            .await?;
        Ok(safe_list(&response, "rows")
            .map(|rows| rows.iter().map(Self::parse_account).collect())
            .unwrap_or_default())
    }

    async fn fetch_balance(&self, params: &Params) -> CcxtResult<Balances> {
        self.load_markets(false).await?;
        let response = self.request("balances", "v3private", "GET", params).await?;
        let data = safe_value(&response, "data").cloned().unwrap_or(Value::Null);
        Ok(self.parse_balance(&data))
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
        let tick_price = market.precision.price;

        let reduce_only = safe_bool(&query, "reduceOnly").or_else(|| safe_bool(&query, "reduce_only"));
        let trigger = safe_decimal_n(&query, &["triggerPrice", "stopPrice"]);
        let stop_loss = safe_value(&query, "stopLoss").cloned();
        let take_profit = safe_value(&query, "takeProfit").cloned();
        let algo_type = safe_string(&query, "algoType");
        let trailing_trigger =
            safe_decimal_n(&query, &["trailingTriggerPrice", "activatedPrice"]).or(price);
        let trailing_amount = safe_string2(&query, "trailingAmount", "callbackValue");
        let trailing_percent = safe_string2(&query, "trailingPercent", "callbackRate");
        let is_trailing = trailing_amount.is_some() || trailing_percent.is_some();
        let is_algo = is_trailing
            || trigger.is_some()
            || stop_loss.is_some()
            || take_profit.is_some()
            || query.get("childOrders").is_some();
        let is_market = order_type == OrderType::Market;
        let time_in_force = safe_string_lower(&query, "timeInForce");
        let post_only = safe_bool(&query, "postOnly").unwrap_or(false)
            || time_in_force.as_deref() == Some("po");
        if post_only && is_market {
            return Err(CcxtError::InvalidOrder {
                message: "woo market orders cannot be postOnly".into(),
            });
        }

        // v3 algo 주문은 camelCase 키를 쓴다
        let (reduce_key, client_key, quantity_key, price_key, type_key) = if is_algo {
            ("reduceOnly", "clientOrderId", "quantity", "price", "type")
        } else {
            ("reduce_only", "client_order_id", "order_quantity", "order_price", "order_type")
        };
        let side_id = side.as_str().to_uppercase();

        let mut request = Params::new();
        request.insert("symbol".into(), json!(market.id));
        request.insert("side".into(), json!(side_id));
        request.insert(type_key.into(), json!(order_type.as_str().to_uppercase()));
        if !is_algo {
            let vendor_type = if post_only {
                Some("POST_ONLY")
            } else {
                match time_in_force.as_deref() {
                    Some("fok") => Some("FOK"),
                    Some("ioc") => Some("IOC"),
                    _ => None,
                }
            };
            if let Some(vendor_type) = vendor_type {
                request.insert("order_type".into(), json!(vendor_type));
            }
        }
        if reduce_only == Some(true) {
            request.insert(reduce_key.into(), json!(true));
        }
        if let Some(price) = price {
            request.insert(price_key.into(), json!(price_to_precision(price, tick_price)));
        }

        if is_market && !is_algo {
            if market.spot && side == OrderSide::Buy {
                let requires_price = safe_bool(&query, "createMarketBuyOrderRequiresPrice")
                    .or_else(|| {
                        self.descriptor
                            .option_bool(self.config.options(), "createMarketBuyOrderRequiresPrice")
                    })
                    .unwrap_or(true);
                let quote_amount = match (safe_decimal_n(&query, &["cost", "order_amount"]), price) {
                    (Some(cost), _) => cost,
                    (None, Some(price)) if requires_price => amount * price,
                    (None, None) if requires_price => {
                        return Err(CcxtError::InvalidOrder {
                            message: "woo createOrder() requires the price argument for market buy orders \
                                      to calculate the total cost to spend (amount * price), or pass \
                                      createMarketBuyOrderRequiresPrice=false with the cost as amount"
                                .into(),
                        });
                    },
                    (None, _) => amount,
                };
                request.insert("order_amount".into(), json!(cost_to_precision(quote_amount, tick_price)));
            } else {
                request.insert(
                    "order_quantity".into(),
                    json!(amount_to_precision(amount, market.precision.amount)),
                );
            }
        } else if algo_type.as_deref() != Some("POSITIONAL_TP_SL") {
            request.insert(
                quantity_key.into(),
                json!(amount_to_precision(amount, market.precision.amount)),
            );
        }

        if let Some(client_order_id) = safe_string_n(&query, &["clOrdID", "clientOrderId", "client_order_id"]) {
            request.insert(client_key.into(), json!(client_order_id));
        }

        if is_trailing {
            let activated = trailing_trigger.ok_or_else(|| {
                CcxtError::arguments_required(
                    "woo createOrder() requires a trailingTriggerPrice parameter for trailing orders",
                )
            })?;
            request.insert("activatedPrice".into(), json!(price_to_precision(activated, tick_price)));
            request.insert("algoType".into(), json!("TRAILING_STOP"));
            if let Some(trailing_amount) = trailing_amount {
                request.insert("callbackValue".into(), json!(trailing_amount));
            } else if let Some(rate) = Self::callback_rate(trailing_percent.as_deref()) {
                request.insert("callbackRate".into(), json!(rate));
            }
        } else if let Some(trigger) = trigger {
            if algo_type.as_deref() != Some("TRAILING_STOP") {
                request.insert("triggerPrice".into(), json!(price_to_precision(trigger, tick_price)));
                request.insert("algoType".into(), json!("STOP"));
            }
        } else if stop_loss.is_some() || take_profit.is_some() {
            let close_side = if side == OrderSide::Buy { "SELL" } else { "BUY" };
            let child = |leg: &Value, algo: &str| -> Option<Value> {
                let trigger = safe_decimal_n(leg, &["triggerPrice", "price"]).or_else(|| {
                    match leg {
                        Value::String(s) => parse_decimal(s),
                        Value::Number(n) => parse_decimal(&n.to_string()),
                        _ => None,
                    }
                })?;
                Some(json!({
                    "side": close_side,
                    "algoType": algo,
                    "triggerPrice": price_to_precision(trigger, tick_price),
                    "type": "CLOSE_POSITION",
                    "reduceOnly": true,
                }))
            };
            let mut children = Vec::new();
            if let Some(leg) = stop_loss.as_ref().and_then(|sl| child(sl, "STOP_LOSS")) {
                children.push(leg);
            }
            if let Some(leg) = take_profit.as_ref().and_then(|tp| child(tp, "TAKE_PROFIT")) {
                children.push(leg);
            }
            request.insert("algoType".into(), json!("BRACKET"));
            request.insert(
                "childOrders".into(),
                json!([{
                    "symbol": market.id,
                    "reduceOnly": false,
                    "algoType": "POSITIONAL_TP_SL",
                    "childOrders": children,
                }]),
            );
        }

        request.extend(omit(
            params,
            &[
                "reduceOnly",
                "reduce_only",
                "clOrdID",
                "clientOrderId",
                "client_order_id",
                "postOnly",
                "timeInForce",
                "stopPrice",
                "triggerPrice",
                "stopLoss",
                "takeProfit",
                "trailingPercent",
                "trailingAmount",
                "trailingTriggerPrice",
                "cost",
                "createMarketBuyOrderRequiresPrice",
            ],
        ));

        let (path, api) = if is_algo {
            ("algo/order", "v3private")
        } else {
            ("order", "v1private")
        };
        let response = self.request(path, api, "POST", &request).await?;
        let created = safe_value(&response, "data")
            .and_then(|data| safe_list(data, "rows"))
            .and_then(|rows| rows.first())
            .cloned();
        Ok(match created {
            Some(row) => self.parse_order(&row, Some(&market)),
            None => {
                let mut order = self.parse_order(&response, Some(&market));
                order.order_type = Some(order_type);
                order
            },
        })
    }

    async fn edit_order(
        &self,
        id: &str,
        symbol: &str,
        _order_type: OrderType,
        _side: OrderSide,
        amount: Option<Decimal>,
        price: Option<Decimal>,
        params: &Params,
    ) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let query = Value::Object(params.clone());
        let tick_price = market.precision.price;

        let mut request = Params::new();
        if let Some(price) = price {
            request.insert("price".into(), json!(price_to_precision(price, tick_price)));
        }
        if let Some(amount) = amount {
            request.insert(
                "quantity".into(),
                json!(amount_to_precision(amount, market.precision.amount)),
            );
        }
        let client_order_id = safe_string_n(&query, &["client_order_id", "clOrdID", "clientOrderId"]);
        let trigger = safe_decimal_n(
            &query,
            &["triggerPrice", "stopPrice", "takeProfitPrice", "stopLossPrice"],
        );
        if let Some(trigger) = trigger {
            request.insert("triggerPrice".into(), json!(price_to_precision(trigger, tick_price)));
        }
        let trailing_amount = safe_string2(&query, "trailingAmount", "callbackValue");
        let trailing_percent = safe_string2(&query, "trailingPercent", "callbackRate");
        let is_trailing = trailing_amount.is_some() || trailing_percent.is_some();
        if is_trailing {
            if let Some(activated) =
                safe_decimal_n(&query, &["trailingTriggerPrice", "activatedPrice"]).or(price)
            {
                request.insert("activatedPrice".into(), json!(price_to_precision(activated, tick_price)));
            }
            if let Some(trailing_amount) = trailing_amount {
                request.insert("callbackValue".into(), json!(trailing_amount));
            } else if let Some(rate) = Self::callback_rate(trailing_percent.as_deref()) {
                request.insert("callbackRate".into(), json!(rate));
            }
        }
        let rest = omit(
            params,
            &[
                "clOrdID",
                "clientOrderId",
                "client_order_id",
                "stopPrice",
                "triggerPrice",
                "takeProfitPrice",
                "stopLossPrice",
                "trailingTriggerPrice",
                "trailingAmount",
                "trailingPercent",
            ],
        );
        let is_algo = is_trailing || trigger.is_some() || rest.contains_key("childOrders");

        let path = match (&client_order_id, is_algo) {
            (Some(client_order_id), algo) => {
                request.insert("client_order_id".into(), json!(client_order_id));
                if algo {
                    "algo/order/client/{client_order_id}"
                } else {
                    "order/client/{client_order_id}"
                }
            },
            (None, algo) => {
                request.insert("oid".into(), json!(id));
                if algo {
                    "algo/order/{oid}"
                } else {
                    "order/{oid}"
                }
            },
        };
        request.extend(rest);

        let response = self.request(path, "v3private", "PUT", &request).await?;
        let data = safe_value(&response, "data").cloned().unwrap_or(Value::Null);
        Ok(self.parse_order(&data, Some(&market)))
    }

    async fn cancel_order(&self, id: &str, symbol: Option<&str>, params: &Params) -> CcxtResult<Order> {
        let query = Value::Object(params.clone());
        let stop = safe_bool(&query, "stop").or(safe_bool(&query, "trigger")).unwrap_or(false);
        if !stop && symbol.is_none() {
            return Err(CcxtError::arguments_required(
                "woo cancelOrder() requires a symbol argument",
            ));
        }
        self.load_markets(false).await?;
        let market = symbol.map(|s| self.market(s)).transpose()?;
        let client_order_id = safe_string_n(&query, &["client_order_id", "clOrdID", "clientOrderId"]);
        let rest = omit(params, &["stop", "trigger", "clOrdID", "clientOrderId", "client_order_id"]);

        let mut request = Params::new();
        let (path, api) = match (&market, &client_order_id) {
            (Some(market), Some(client_order_id)) if !stop => {
                request.insert("symbol".into(), json!(market.id));
                request.insert("client_order_id".into(), json!(client_order_id));
                ("client/order", "v1private")
            },
            (Some(market), None) if !stop => {
                request.insert("symbol".into(), json!(market.id));
                request.insert("order_id".into(), json!(id));
                ("order", "v1private")
            },
            _ => {
                request.insert("order_id".into(), json!(id));
                ("algo/order/{order_id}", "v3private")
            },
        };
        request.extend(rest);

        let response = self.request(path, api, "DELETE", &request).await?;
        let mut order = self.parse_order(&response, market.as_ref());
        order.symbol = market.map(|m| m.symbol).or(order.symbol);
        match client_order_id {
            Some(client_order_id) if !stop => order.client_order_id = Some(client_order_id),
            _ => order.id = id.to_string(),
        }
        Ok(order)
    }

    /// 일괄 취소 응답은 상태만 담고 있어 빈 목록을 돌려준다
    async fn cancel_all_orders(&self, symbol: Option<&str>, params: &Params) -> CcxtResult<Vec<Order>> {
        self.load_markets(false).await?;
        let query = Value::Object(params.clone());
        let stop = safe_bool(&query, "stop").or(safe_bool(&query, "trigger")).unwrap_or(false);
        let rest = omit(params, &["stop", "trigger"]);

        if stop {
            self.request("algo/orders/pending", "v3private", "DELETE", &rest)
                .await?;
            return Ok(Vec::new());
        }
        let symbol = symbol.ok_or_else(|| {
            CcxtError::arguments_required("woo cancelAllOrders() requires a symbol argument")
        })?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("symbol".into(), json!(market.id));
        request.extend(rest);
        self.request("orders", "v1private", "DELETE", &request).await?;
        Ok(Vec::new())
    }

    async fn fetch_order(&self, id: &str, symbol: Option<&str>, params: &Params) -> CcxtResult<Order> {
        self.load_markets(false).await?;
        let market = symbol.map(|s| self.market(s)).transpose()?;
        let query = Value::Object(params.clone());
        let stop = safe_bool(&query, "stop").or(safe_bool(&query, "trigger")).unwrap_or(false);
        let client_order_id = safe_string2(&query, "clOrdID", "clientOrderId");
        let rest = omit(params, &["stop", "trigger", "clOrdID", "clientOrderId"]);

        let mut request = Params::new();
        let (path, api) = match client_order_id {
            _ if stop => {
                request.insert("oid".into(), json!(id));
                ("algo/order/{oid}", "v3private")
            },
            Some(client_order_id) => {
                request.insert("client_order_id".into(), json!(client_order_id));
                ("client/order/{client_order_id}", "v1private")
            },
            None => {
                request.insert("oid".into(), json!(id));
                ("order/{oid}", "v1private")
            },
        };
        request.extend(rest);

        let response = self.request(path, api, "GET", &request).await?;
        let data = safe_value(&response, "data").unwrap_or(&response);
        Ok(self.parse_order(data, market.as_ref()))
    }

    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_orders_with_status(symbol, since, limit, params, None)
            .await
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_orders_with_status(symbol, since, limit, params, Some("INCOMPLETE"))
            .await
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Order>> {
        self.fetch_orders_with_status(symbol, since, limit, params, Some("COMPLETED"))
            .await
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
            request.insert("symbol".into(), json!(market.id));
        }
        if let Some(since) = since {
            request.insert("start_t".into(), json!(since));
        }
        request.extend(params.clone());

        let response = self
            .request("client/trades", "v1private", "GET", &request)
            .await?;
        let mut trades: Vec<Trade> = safe_list(&response, "rows")
            .map(|rows| rows.iter().map(|t| self.parse_trade(t, market.as_ref())).collect())
            .unwrap_or_default();
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
        let market = symbol.map(|s| self.market(s)).transpose()?;
        let mut request = Params::new();
        request.insert("oid".into(), json!(id));
        request.extend(params.clone());

        let response = self
            .request("order/{oid}/trades", "v1private", "GET", &request)
            .await?;
        let trades = safe_list(&response, "rows")
            .map(|rows| rows.iter().map(|t| self.parse_trade(t, market.as_ref())).collect())
            .unwrap_or_default();
        Ok(filter_by_since_limit(trades, since, limit))
    }

    async fn fetch_ledger(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<LedgerEntry>> {
        let rows = self.asset_history(code, since, limit, params).await?;
        let entries = rows.iter().map(|r| self.parse_ledger_entry(r, code)).collect();
        Ok(filter_by_since_limit(entries, since, limit))
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let mut request = Params::new();
        request.insert("token_side".into(), json!("DEPOSIT"));
        request.extend(params.clone());
        self.fetch_transactions(code, since, limit, &request).await
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let mut request = Params::new();
        request.insert("token_side".into(), json!("WITHDRAW"));
        request.extend(params.clone());
        self.fetch_transactions(code, since, limit, &request).await
    }

    async fn fetch_transactions(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<Transaction>> {
        let mut request = Params::new();
        request.insert("type".into(), json!("BALANCE"));
        request.extend(params.clone());
        let rows = self.asset_history(code, since, limit, &request).await?;
        let transactions = rows.iter().map(|r| self.parse_transaction(r, code)).collect();
        Ok(filter_by_since_limit(transactions, since, limit))
    }

    async fn fetch_deposit_address(&self, code: &str, params: &Params) -> CcxtResult<DepositAddress> {
        self.load_markets(false).await?;
        let currency = self.currency(code)?;
        let network = params
            .get("network")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| Self::default_network(&currency))
            .ok_or_else(|| CcxtError::arguments_required(format!(
                "woo fetchDepositAddress() requires a network for {code}"
            )))?;

        let mut request = Params::new();
        request.insert("token".into(), json!(format!("{network}_{}", currency.code)));
        request.extend(omit(params, &["network"]));

        let response = self
            .request("asset/deposit", "v1private", "GET", &request)
            .await?;
        let address = safe_string(&response, "address")
            .filter(|a| !a.is_empty())
            .ok_or_else(|| CcxtError::InvalidAddress {
                message: format!("woo returned no deposit address for {code}"),
            })?;

        Ok(DepositAddress {
            currency: code.to_string(),
            network: Some(network),
            address,
            tag: safe_string(&response, "extra"),
            info: response,
        })
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
        let network = params
            .get("network")
            .and_then(Value::as_str)
            .map(str::to_uppercase);
        let networks = self.option("networks").unwrap_or(Value::Null);
        let network_id = network
            .as_deref()
            .map(|n| safe_string(&networks, n).unwrap_or_else(|| n.to_string()));
        let token = network_id
            .as_deref()
            .and_then(|id| currency.networks.get(id))
            .map(|n| n.id.clone())
            .ok_or_else(|| CcxtError::BadRequest {
                message: "woo withdraw() requires a network parameter".into(),
            })?;

        let mut request = Params::new();
        request.insert("amount".into(), json!(amount.to_string()));
        request.insert("address".into(), json!(address));
        request.insert("token".into(), json!(token));
        if let Some(tag) = tag {
            request.insert("extra".into(), json!(tag));
        }
        request.extend(omit(params, &["network"]));

        let response = self
            .request("asset/withdraw", "v1private", "POST", &request)
            .await?;
        let mut transaction = self.parse_transaction(&response, Some(&currency.code));
        transaction.tx_type = Some(TransactionType::Withdrawal);
        transaction.amount = transaction.amount.or(Some(amount));
        transaction.address_to = transaction.address_to.or_else(|| Some(address.to_string()));
        Ok(transaction)
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
        let mut request = Params::new();
        request.insert("token".into(), json!(currency.id));
        request.insert("amount".into(), json!(amount.to_string()));
        request.insert("from_application_id".into(), json!(from_account));
        request.insert("to_application_id".into(), json!(to_account));
        request.extend(params.clone());

        let response = self
            .request("asset/main_sub_transfer", "v1private", "POST", &request)
            .await?;
        let mut transfer = self.parse_transfer(&response, Some(&currency.code));
        let fill_from_request = self
            .option("transfer")
            .and_then(|v| safe_bool(&v, "fillResponseFromRequest"))
            .unwrap_or(true);
        if fill_from_request {
            transfer.amount = Some(amount);
            transfer.from_account = Some(from_account.to_string());
            transfer.to_account = Some(to_account.to_string());
        }
        Ok(transfer)
    }

    async fn fetch_transfers(
        &self,
        code: Option<&str>,
        since: Option<i64>,
        limit: Option<u32>,
        params: &Params,
    ) -> CcxtResult<Vec<TransferEntry>> {
        let mut request = Params::new();
        request.insert("type".into(), json!("COLLATERAL"));
        request.extend(params.clone());
        let rows = self.asset_history(code, since, limit, &request).await?;
        let transfers = rows.iter().map(|r| self.parse_transfer(r, code)).collect();
        Ok(filter_by_since_limit(transfers, since, limit))
    }

    async fn fetch_position(&self, symbol: &str, params: &Params) -> CcxtResult<Position> {
        self.load_markets(false).await?;
        let market = self.market(symbol)?;
        let mut request = Params::new();
        request.insert("symbol".into(), json!(market.id));
        request.extend(params.clone());

        let response = self
            .request("position/{symbol}", "v1private", "GET", &request)
            .await?;
        Ok(self.parse_position(&response, Some(&market)))
    }

    async fn fetch_positions(
        &self,
        symbols: Option<&[&str]>,
        params: &Params,
    ) -> CcxtResult<Vec<Position>> {
        self.load_markets(false).await?;
        let response = self.request("positions", "v3private", "GET", params).await?;
        let positions: Vec<Position> = safe_value(&response, "data")
            .and_then(|data| safe_list(data, "positions"))
            .map(|rows| rows.iter().map(|p| self.parse_position(p, None)).collect())
            .unwrap_or_default();
        Ok(match symbols {
            Some(wanted) => positions
                .into_iter()
                .filter(|p| wanted.contains(&p.symbol.as_str()))
                .collect(),
            None => positions,
        })
    }

    fn sign(&self, path: &str, api: &str, method: &str, params: &Params) -> CcxtResult<SignedRequest> {
        let (version, access) = api.split_at(2);
        let (path_with_params, mut query) = implode_params(path, params);
        let base = self.descriptor.api_url(api, &self.config)?;
        let mut url = format!("{base}/{path_with_params}");

        if access != "private" {
            return Ok(SignedRequest {
                url: with_query(&url, &query),
                method: method.to_string(),
                ..Default::default()
            });
        }

        let credentials = Credentials::require(&self.config, self.descriptor.id.as_str())?;
        if method == "POST" && (path == "algo/order" || path == "order") && !self.config.is_sandbox() {
            let broker_id = self
                .descriptor
                .option_str(self.config.options(), "brokerId")
                .unwrap_or_else(|| BROKER_ID.to_string());
            let key = if path.starts_with("algo") { "brokerId" } else { "broker_id" };
            query.insert(key.into(), json!(broker_id));
        }

        let timestamp = now_ms().to_string();
        let has_body = matches!(method, "POST" | "PUT" | "DELETE");
        let mut headers = HashMap::new();
        headers.insert("x-api-key".to_string(), credentials.api_key.to_string());
        headers.insert("x-api-timestamp".to_string(), timestamp.clone());

        let (auth, body) = if version == "v3" {
            let mut auth = format!("{timestamp}{method}/{version}/{path_with_params}");
            let body = if has_body {
                let body = serde_json::to_string(&query)?;
                auth.push_str(&body);
                Some(body)
            } else {
                if !query.is_empty() {
                    let encoded = urlencode(&query);
                    url = format!("{url}?{encoded}");
                    auth = format!("{auth}?{encoded}");
                }
                None
            };
            headers.insert("content-type".to_string(), "application/json".to_string());
            (auth, body)
        } else {
            let encoded = urlencode(&query);
            let body = if has_body {
                Some(encoded.clone())
            } else {
                if !encoded.is_empty() {
                    url = format!("{url}?{encoded}");
                }
                None
            };
            headers.insert(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            );
            (format!("{encoded}|{timestamp}"), body)
        };

        let signature = SigningScheme::HmacSha256Hex.signature(&credentials, &auth)?;
        headers.insert("x-api-signature".to_string(), signature);

        Ok(SignedRequest {
            url,
            method: method.to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::crypto::hmac_sha256_hex;
    use rust_decimal_macros::dec;

    fn create_test_woo() -> Woo {
        Woo::new(ExchangeConfig::new()).unwrap()
    }

    fn authenticated() -> Woo {
        Woo::new(ExchangeConfig::new().with_credentials("woo-key", "woo-secret")).unwrap()
    }

    #[test]
    fn test_exchange_id() {
        let woo = create_test_woo();
        assert_eq!(woo.id(), ExchangeId::Woo);
        assert_eq!(woo.name(), "WOO X");
        assert_eq!(woo.descriptor().timeframe(Timeframe::Month1).unwrap(), "1mon");
    }

    #[test]
    fn test_has_features() {
        let features = create_test_woo().has().clone();
        assert!(features.spot && features.swap);
        assert!(features.fetch_ledger);
        assert!(features.fetch_trading_fees);
        assert!(!features.fetch_ticker);
        assert!(!features.fetch_tickers);
    }

    #[tokio::test]
    async fn test_ticker_is_not_supported() {
        let err = create_test_woo()
            .fetch_ticker("BTC/USDT", &Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_parse_markets() {
        let woo = create_test_woo();
        let spot = woo
            .parse_market(&json!({
                "symbol": "SPOT_BTC_USDT",
                "quote_min": 100, "quote_max": 100000, "quote_tick": 0.01,
                "base_min": 0.0001, "base_max": 20, "base_tick": 0.0001,
                "min_notional": 0.02, "created_time": "1575441595.65"
            }))
            .unwrap();
        assert_eq!(spot.symbol, "BTC/USDT");
        assert!(spot.spot && spot.margin);
        assert_eq!(spot.precision.price, Some(dec!(0.01)));
        assert_eq!(spot.created, Some(1_575_441_595_650));

        let perp = woo
            .parse_market(&json!({ "symbol": "PERP_ETH_USDT", "base_tick": 0.001 }))
            .unwrap();
        assert_eq!(perp.symbol, "ETH/USDT:USDT");
        assert!(perp.swap && perp.linear == Some(true));
        assert_eq!(perp.settle_id.as_deref(), Some("USDT"));

        assert!(woo.parse_market(&json!({ "symbol": "MOVE_BTC" })).is_none());
    }

    #[test]
    fn test_parse_order() {
        let order = create_test_woo().parse_order(
            &json!({
                "symbol": "SPOT_BTC_USDT",
                "status": "PARTIAL_FILLED",
                "side": "BUY",
                "created_time": "1641480933.000",
                "order_id": 118933,
                "order_tag": "default",
                "price": 40000,
                "type": "LIMIT",
                "quantity": 0.5,
                "executed": 0.2,
                "visible": 0.5,
                "total_fee": 0.0001,
                "fee_asset": "BTC",
                "client_order_id": 0,
                "average_executed_price": 40000
            }),
            None,
        );
        assert_eq!(order.id, "118933");
        assert_eq!(order.client_order_id, None);
        assert_eq!(order.status, Some(OrderStatus::Open));
        assert_eq!(order.symbol.as_deref(), Some("BTC/USDT"));
        assert_eq!(order.side, Some(OrderSide::Buy));
        assert_eq!(order.order_type, Some(OrderType::Limit));
        assert_eq!(order.remaining, Some(dec!(0.3)));
        assert_eq!(order.timestamp, Some(1_641_480_933_000));
        assert_eq!(order.fee.unwrap().currency.as_deref(), Some("BTC"));
    }

    #[test]
    fn test_parse_algo_order_millisecond_time() {
        let order = create_test_woo().parse_order(
            &json!({
                "algoOrderId": 1578938,
                "clientOrderId": 0,
                "algoType": "STOP",
                "symbol": "PERP_BTC_USDT",
                "side": "SELL",
                "type": "MARKET",
                "triggerPrice": "29000",
                "quantity": "0.01",
                "algoStatus": "NEW",
                "createdTime": "1676277825.917"
            }),
            None,
        );
        assert_eq!(order.id, "1578938");
        assert_eq!(order.order_type, Some(OrderType::Market));
        assert_eq!(order.trigger_price, Some(dec!(29000)));
        assert_eq!(order.timestamp, Some(1_676_277_825_917));
    }

    #[test]
    fn test_parse_trade_maker_flag() {
        let woo = create_test_woo();
        let fill = woo.parse_trade(
            &json!({
                "id": 5, "symbol": "SPOT_BTC_USDT", "order_id": 211,
                "executed_price": 10892.84, "executed_quantity": 0.002,
                "is_maker": 1, "side": "SELL", "fee": 0, "fee_asset": "USDT",
                "executed_timestamp": "1566264290.250"
            }),
            None,
        );
        assert_eq!(fill.taker_or_maker, Some(TakerOrMaker::Maker));
        assert_eq!(fill.cost, Some(dec!(21.78568)));

        let public = woo.parse_trade(
            &json!({
                "symbol": "SPOT_BTC_USDT", "side": "BUY", "executed_price": 46222.35,
                "executed_quantity": 0.0012, "executed_timestamp": "1641241162.329"
            }),
            None,
        );
        assert_eq!(public.taker_or_maker, None);
    }

    #[test]
    fn test_parse_transaction_chain_code() {
        let tx = create_test_woo().parse_transaction(
            &json!({
                "id": "22010508193900165",
                "token": "BSC_USDT",
                "target_address": "0x31d64B3230f8baDD91dE1710A65DF536aF8f7cDa",
                "source_address": "0x70fd25717f769c7f9a46b319f0f9103c0d887af0",
                "extra": "",
                "type": "BALANCE",
                "token_side": "WITHDRAW",
                "amount": 1000,
                "tx_id": "0x8a74c517bc104c8ebad0c3c3f64b1f302ed5f8e6b3f9c8e8a2f3b1c4d5e6f7a8",
                "fee_token": "",
                "fee_amount": 0,
                "status": "CONFIRMING",
                "created_time": "1641370779.442",
                "updated_time": "1641370779.465"
            }),
            None,
        );
        assert_eq!(tx.currency.as_deref(), Some("USDT"));
        assert_eq!(tx.tx_type, Some(TransactionType::Withdrawal));
        assert_eq!(tx.status, Some(TransactionStatus::Pending));
        assert_eq!(tx.timestamp, Some(1_641_370_779_442));
    }

    #[test]
    fn test_parse_short_position() {
        let position = create_test_woo().parse_position(
            &json!({
                "symbol": "PERP_ETH_USDT",
                "holding": "-2",
                "averageOpenPrice": "1500",
                "markPrice": "1400",
                "estLiqPrice": "2100",
                "timestamp": 1673323880342u64
            }),
            None,
        );
        assert_eq!(position.symbol, "ETH/USDT:USDT");
        assert_eq!(position.contracts, Some(dec!(2)));
        assert_eq!(position.unrealized_pnl, Some(dec!(200)));
        assert_eq!(position.timestamp, Some(1_673_323_880_342));
        assert_eq!(position.margin_mode, Some(MarginMode::Cross));
    }

    #[test]
    fn test_v1_get_signature() {
        let woo = authenticated();
        let mut params = Params::new();
        params.insert("symbol".into(), json!("SPOT_BTC_USDT"));
        params.insert("status".into(), json!("INCOMPLETE"));

        let signed = woo.sign("orders", "v1private", "GET", &params).unwrap();
        assert_eq!(
            signed.url,
            "https://api.woo.org/v1/orders?status=INCOMPLETE&symbol=SPOT_BTC_USDT"
        );
        let timestamp = signed.headers.get("x-api-timestamp").unwrap();
        let expected = hmac_sha256_hex(
            "woo-secret",
            &format!("status=INCOMPLETE&symbol=SPOT_BTC_USDT|{timestamp}"),
        )
        .unwrap();
        assert_eq!(signed.headers.get("x-api-signature"), Some(&expected));
        assert_eq!(signed.headers.get("x-api-key").map(String::as_str), Some("woo-key"));
    }

    #[test]
    fn test_v1_order_post_injects_broker() {
        let woo = authenticated();
        let mut params = Params::new();
        params.insert("symbol".into(), json!("SPOT_BTC_USDT"));
        params.insert("order_type".into(), json!("LIMIT"));

        let signed = woo.sign("order", "v1private", "POST", &params).unwrap();
        let body = signed.body.unwrap();
        assert_eq!(
            body,
            format!("broker_id={BROKER_ID}&order_type=LIMIT&symbol=SPOT_BTC_USDT")
        );
        assert_eq!(signed.url, "https://api.woo.org/v1/order");
    }

    #[test]
    fn test_v3_post_signature() {
        let woo = authenticated();
        let mut params = Params::new();
        params.insert("symbol".into(), json!("PERP_BTC_USDT"));
        params.insert("algoType".into(), json!("STOP"));

        let signed = woo.sign("algo/order", "v3private", "POST", &params).unwrap();
        let body = signed.body.clone().unwrap();
        let decoded: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(decoded["brokerId"], BROKER_ID);

        let timestamp = signed.headers.get("x-api-timestamp").unwrap();
        let expected =
            hmac_sha256_hex("woo-secret", &format!("{timestamp}POST/v3/algo/order{body}")).unwrap();
        assert_eq!(signed.headers.get("x-api-signature"), Some(&expected));
        assert_eq!(
            signed.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_sandbox_skips_broker() {
        let woo = Woo::new(
            ExchangeConfig::new()
                .with_credentials("woo-key", "woo-secret")
                .with_sandbox(true),
        )
        .unwrap();
        let signed = woo.sign("order", "v1private", "POST", &Params::new()).unwrap();
        assert_eq!(signed.url, "https://api.staging.woo.org/v1/order");
        assert_eq!(signed.body.as_deref(), Some(""));
    }

    #[test]
    fn test_private_sign_without_credentials_fails() {
        let err = create_test_woo()
            .sign("balances", "v3private", "GET", &Params::new())
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_error_mapping() {
        let woo = create_test_woo();
        let context = RequestContext::new("woo", "GET", "https://api.woo.org/v1/orders");
        let kind = |status: u16, body: &str| woo.handle_errors(status, &context, body).unwrap_err().kind();

        assert_eq!(
            kind(429, r#"{"success":false,"code":-1003,"message":"Rate limit exceed."}"#),
            ErrorKind::RateLimitExceeded
        );
        // broad wins over exact
        assert_eq!(
            kind(400, r#"{"success":false,"code":-1000,"message":"The token is not supported"}"#),
            ErrorKind::BadRequest
        );
        assert_eq!(
            kind(400, r#"{"success":false,"code":-1103,"message":"price tick"}"#),
            ErrorKind::InvalidOrder
        );
        assert_eq!(kind(500, "gateway down"), ErrorKind::ExchangeError);
        assert!(woo
            .handle_errors(200, &context, r#"{"success":true,"rows":[]}"#)
            .is_ok());
    }
}
