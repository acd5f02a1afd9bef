//! Market type - 거래소 마켓 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 마켓 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    #[default]
    Spot,
    Margin,
    Swap,
    Future,
    Option,
}

/// 마켓 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// 거래소 내부 ID (예: 'BTC-USD', 'SPOT_BTC_USDT')
    pub id: String,
    /// 통합 심볼 (예: 'BTC/USDT', 'BTC/USDT:USDT')
    pub symbol: String,
    /// 기준 화폐
    pub base: String,
    /// 견적 화폐
    pub quote: String,
    /// 정산 화폐 (파생상품용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle: Option<String>,
    pub base_id: String,
    pub quote_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_id: Option<String>,
    /// 마켓 타입
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub spot: bool,
    pub margin: bool,
    pub swap: bool,
    pub future: bool,
    pub option: bool,
    /// 활성 상태 (알 수 없으면 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// 계약 여부
    pub contract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<Decimal>,
    /// 계약 크기
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_size: Option<Decimal>,
    /// 만기 (밀리초)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_datetime: Option<String>,
    /// 정밀도 (tick size)
    pub precision: MarketPrecision,
    /// 거래 제한
    pub limits: MarketLimits,
    /// 상장 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// 원본 응답
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 마켓 정밀도
///
/// 모든 값은 tick size (`0.01` = 소수 둘째 자리)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketPrecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
}

/// 마켓 제한
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketLimits {
    #[serde(default)]
    pub amount: MinMax,
    #[serde(default)]
    pub price: MinMax,
    #[serde(default)]
    pub cost: MinMax,
    #[serde(default)]
    pub leverage: MinMax,
}

/// 최소/최대 값
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl MinMax {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }
}

/// 통합 심볼 생성
///
/// - 현물: `BASE/QUOTE`
/// - 무기한: `BASE/QUOTE:SETTLE`
/// - 만기 선물: `BASE/QUOTE:SETTLE-YYMMDD`
pub fn build_symbol(base: &str, quote: &str, settle: Option<&str>, expiry: Option<&str>) -> String {
    match (settle, expiry) {
        (Some(settle), Some(expiry)) => format!("{base}/{quote}:{settle}-{expiry}"),
        (Some(settle), None) => format!("{base}/{quote}:{settle}"),
        (None, _) => format!("{base}/{quote}"),
    }
}

impl Market {
    /// 현물 마켓 생성
    pub fn spot(id: impl Into<String>, base: &str, quote: &str) -> Self {
        Self {
            id: id.into(),
            symbol: build_symbol(base, quote, None, None),
            base: base.to_string(),
            quote: quote.to_string(),
            base_id: base.to_string(),
            quote_id: quote.to_string(),
            market_type: MarketType::Spot,
            spot: true,
            active: Some(true),
            ..Default::default()
        }
    }

    /// 선형 무기한 스왑 마켓 생성 (견적 화폐로 정산)
    pub fn linear_swap(id: impl Into<String>, base: &str, quote: &str) -> Self {
        Self {
            id: id.into(),
            symbol: build_symbol(base, quote, Some(quote), None),
            base: base.to_string(),
            quote: quote.to_string(),
            settle: Some(quote.to_string()),
            base_id: base.to_string(),
            quote_id: quote.to_string(),
            settle_id: Some(quote.to_string()),
            market_type: MarketType::Swap,
            swap: true,
            contract: true,
            linear: Some(true),
            inverse: Some(false),
            contract_size: Some(Decimal::ONE),
            active: Some(true),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_forms() {
        assert_eq!(build_symbol("BTC", "USDT", None, None), "BTC/USDT");
        assert_eq!(build_symbol("BTC", "USDT", Some("USDT"), None), "BTC/USDT:USDT");
        assert_eq!(
            build_symbol("BTC", "USD", Some("USD"), Some("240628")),
            "BTC/USD:USD-240628"
        );
    }

    #[test]
    fn test_spot_and_swap_constructors() {
        let spot = Market::spot("SPOT_BTC_USDT", "BTC", "USDT");
        assert!(spot.spot && !spot.contract);
        assert_eq!(spot.symbol, "BTC/USDT");

        let swap = Market::linear_swap("PERP_BTC_USDT", "BTC", "USDT");
        assert_eq!(swap.symbol, "BTC/USDT:USDT");
        assert_eq!(swap.market_type, MarketType::Swap);
        assert_eq!(swap.settle.as_deref(), Some("USDT"));
    }
}
