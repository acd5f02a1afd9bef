//! Account Types
//!
//! Types for accounts, ledger history, internal transfers and deposit addresses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fee::Fee;

/// Account information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    /// Account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Account type (e.g., "wallet", "fiat", "spot", "sub")
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,

    /// Currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Raw exchange response
    #[serde(default)]
    pub info: Value,
}

/// Deposit address information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositAddress {
    /// Currency code
    pub currency: String,

    /// Unified network code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    /// Deposit address
    pub address: String,

    /// Memo / destination tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Raw exchange response
    #[serde(default)]
    pub info: Value,
}

/// Transfer entry (internal transfer between accounts)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Source account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,

    /// Destination account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,

    /// Unified status ("ok", "pending", "failed", "canceled")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub info: Value,
}

/// Ledger direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerDirection {
    In,
    Out,
}

/// Ledger entry (account history record)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<LedgerDirection>,

    /// Account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Reference ID (e.g., order ID, transaction ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_account: Option<String>,

    /// Entry type ("trade", "fee", "transaction", "transfer", "rebate"...)
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Absolute amount; sign lives in `direction`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Decimal>,

    /// Unified status ("ok", "pending", "failed", "canceled")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,

    #[serde(default)]
    pub info: Value,
}

impl LedgerEntry {
    /// Split a signed amount into direction and absolute value
    pub fn with_signed_amount(mut self, amount: Option<Decimal>) -> Self {
        if let Some(amount) = amount {
            self.direction = Some(if amount.is_sign_negative() {
                LedgerDirection::Out
            } else {
                LedgerDirection::In
            });
            self.amount = Some(amount.abs());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amount() {
        let entry = LedgerEntry::default().with_signed_amount(Some(dec!(-1.25)));
        assert_eq!(entry.direction, Some(LedgerDirection::Out));
        assert_eq!(entry.amount, Some(dec!(1.25)));

        let entry = LedgerEntry::default().with_signed_amount(None);
        assert!(entry.direction.is_none());
    }
}
