//! Fee type - 수수료 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 수수료 정보
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// 수수료 금액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    /// 수수료 화폐
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// 수수료율
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

impl Fee {
    pub fn new(cost: Option<Decimal>, currency: Option<String>) -> Self {
        Self {
            cost,
            currency,
            rate: None,
        }
    }

    /// 비용과 화폐가 모두 없으면 None
    pub fn non_empty(self) -> Option<Self> {
        if self.cost.is_none() && self.currency.is_none() && self.rate.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

/// 마켓별 거래 수수료
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingFee {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_based: Option<bool>,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 거래량 구간별 수수료율 `(30일 거래량 하한, 수수료율)`
pub type FeeTier = (Decimal, Decimal);

/// 거래소 수수료 체계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub taker: Option<Decimal>,
    pub maker: Option<Decimal>,
    pub percentage: bool,
    pub tier_based: bool,
    #[serde(default)]
    pub taker_tiers: Vec<FeeTier>,
    #[serde(default)]
    pub maker_tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    /// 고정 수수료율
    pub fn flat(taker: Decimal, maker: Decimal) -> Self {
        Self {
            taker: Some(taker),
            maker: Some(maker),
            percentage: true,
            tier_based: false,
            ..Default::default()
        }
    }

    /// 구간별 수수료율 (첫 구간이 기본 수수료율)
    pub fn tiered(taker_tiers: Vec<FeeTier>, maker_tiers: Vec<FeeTier>) -> Self {
        Self {
            taker: taker_tiers.first().map(|(_, rate)| *rate),
            maker: maker_tiers.first().map(|(_, rate)| *rate),
            percentage: true,
            tier_based: true,
            taker_tiers,
            maker_tiers,
        }
    }

    /// 30일 거래량에 해당하는 `(taker, maker)` 수수료율
    pub fn rates_for_volume(&self, volume: Decimal) -> (Option<Decimal>, Option<Decimal>) {
        let pick = |tiers: &[FeeTier], flat: Option<Decimal>| {
            tiers
                .iter()
                .rev()
                .find(|(floor, _)| volume >= *floor)
                .map(|(_, rate)| *rate)
                .or(flat)
        };
        (
            pick(&self.taker_tiers, self.taker),
            pick(&self.maker_tiers, self.maker),
        )
    }
}
