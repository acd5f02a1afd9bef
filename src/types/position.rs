//! Position Type
//!
//! Represents a futures/derivatives position

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

/// Margin mode for position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    Isolated,
    Cross,
}

/// Futures/derivatives position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Number of contracts (absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_size: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<PositionSide>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidation_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_mode: Option<MarginMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedged: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_margin: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_margin: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,

    /// Raw exchange response
    #[serde(default)]
    pub info: Value,
}

impl Position {
    /// Derive side and absolute size from a signed holding
    pub fn with_signed_size(mut self, size: Option<Decimal>) -> Self {
        if let Some(size) = size {
            self.side = if size.is_zero() {
                None
            } else if size.is_sign_negative() {
                Some(PositionSide::Short)
            } else {
                Some(PositionSide::Long)
            };
            self.contracts = Some(size.abs());
        }
        self
    }

    /// Fill notional, datetime and pnl percentage where inputs are known
    pub fn complete(mut self) -> Self {
        if self.notional.is_none() {
            if let (Some(contracts), Some(price)) = (self.contracts, self.mark_price.or(self.entry_price)) {
                self.notional = Some(contracts * self.contract_size.unwrap_or(Decimal::ONE) * price);
            }
        }
        if self.percentage.is_none() {
            if let (Some(pnl), Some(margin)) = (self.unrealized_pnl, self.initial_margin) {
                if !margin.is_zero() {
                    self.percentage = Some(pnl / margin * Decimal::ONE_HUNDRED);
                }
            }
        }
        if self.datetime.is_none() {
            self.datetime = self.timestamp.and_then(crate::utils::iso8601);
        }
        self
    }
}
