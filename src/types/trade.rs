//! Trade type - 체결 내역

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Fee, OrderSide};

/// 체결 내역
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 주문 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// 주문 타입 (limit/market)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker_or_maker: Option<TakerOrMaker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// 체결 금액 (price * amount)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// 테이커/메이커 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    Taker,
    Maker,
}

impl TakerOrMaker {
    /// `maker`/`MAKER`/`taker`... 파싱
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "maker" => Some(TakerOrMaker::Maker),
            "taker" => Some(TakerOrMaker::Taker),
            _ => None,
        }
    }
}

impl Trade {
    /// 비용이 없으면 price * amount로 채움
    pub fn complete(mut self) -> Self {
        if self.cost.is_none() {
            if let (Some(price), Some(amount)) = (self.price, self.amount) {
                self.cost = Some(price * amount);
            }
        }
        if self.datetime.is_none() {
            self.datetime = self.timestamp.and_then(crate::utils::iso8601);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_complete_cost_and_datetime() {
        let trade = Trade {
            price: Some(dec!(50000)),
            amount: Some(dec!(0.1)),
            timestamp: Some(0),
            ..Default::default()
        }
        .complete();
        assert_eq!(trade.cost, Some(dec!(5000.0)));
        assert_eq!(trade.datetime.as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_taker_or_maker_parse() {
        assert_eq!(TakerOrMaker::parse("MAKER"), Some(TakerOrMaker::Maker));
        assert_eq!(TakerOrMaker::parse("unknown"), None);
    }
}
