//! Unified types
//!
//! 모든 어댑터가 만들어 내는 통합 데이터 구조

mod account;
mod balance;
mod currency;
mod descriptor;
mod exchange;
mod fee;
mod market;
mod ohlcv;
mod order;
mod orderbook;
mod position;
mod ticker;
mod trade;
mod transaction;

pub use account::{Account, DepositAddress, LedgerDirection, LedgerEntry, TransferEntry};
pub use balance::{Balance, Balances};
pub use currency::{Currency, CurrencyLimits, CurrencyNetwork};
pub use descriptor::ExchangeDescriptor;
pub use exchange::{
    Exchange, ExchangeFeatures, ExchangeId, ExchangeStatus, ExchangeUrls, Params, SignedRequest,
    Timeframe,
};
pub use fee::{Fee, FeeSchedule, FeeTier, TradingFee};
pub use market::{build_symbol, Market, MarketLimits, MarketPrecision, MarketType, MinMax};
pub use ohlcv::OHLCV;
pub use order::{Order, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use orderbook::{OrderBook, OrderBookEntry};
pub use position::{MarginMode, Position, PositionSide};
pub use ticker::Ticker;
pub use trade::{TakerOrMaker, Trade};
pub use transaction::{Transaction, TransactionStatus, TransactionType};
