//! Currency type - 화폐 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::MinMax;

/// 화폐 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    /// 화폐 ID (거래소 내부)
    pub id: String,
    /// 통합 코드 (예: 'BTC')
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `crypto` / `fiat`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub currency_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw: Option<bool>,
    /// 출금 수수료
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    /// 정밀도 (tick size)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Decimal>,
    #[serde(default)]
    pub limits: CurrencyLimits,
    /// 네트워크별 정보 (통합 네트워크 코드 → 정보)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub networks: HashMap<String, CurrencyNetwork>,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 화폐 제한
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyLimits {
    #[serde(default)]
    pub amount: MinMax,
    #[serde(default)]
    pub withdraw: MinMax,
    #[serde(default)]
    pub deposit: MinMax,
}

/// 네트워크 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyNetwork {
    /// 거래소 네트워크 ID
    pub id: String,
    /// 통합 네트워크 코드
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Decimal>,
    #[serde(default)]
    pub limits: CurrencyLimits,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Currency {
    /// 네트워크 정보로부터 화폐 단위 플래그를 채운다
    ///
    /// 네트워크 중 하나라도 입금/출금 가능하면 화폐도 가능으로 본다.
    pub fn merge_network_flags(&mut self) {
        if self.networks.is_empty() {
            return;
        }
        let any = |f: fn(&CurrencyNetwork) -> Option<bool>| {
            let flags: Vec<bool> = self.networks.values().filter_map(f).collect();
            if flags.is_empty() {
                None
            } else {
                Some(flags.into_iter().any(|b| b))
            }
        };
        let deposit = any(|n| n.deposit);
        let withdraw = any(|n| n.withdraw);
        if self.deposit.is_none() {
            self.deposit = deposit;
        }
        if self.withdraw.is_none() {
            self.withdraw = withdraw;
        }
        if self.active.is_none() {
            self.active = match (self.deposit, self.withdraw) {
                (Some(d), Some(w)) => Some(d && w),
                _ => None,
            };
        }
    }
}
