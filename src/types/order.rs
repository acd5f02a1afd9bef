//! Order type - 주문 정보

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Fee, Trade};

/// 주문 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
    Expired,
    Rejected,
}

/// 주문 측면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }

    /// 대소문자 무시 파싱
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "buy" | "bid" => Some(OrderSide::Buy),
            "sell" | "ask" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

/// 주문 타입
///
/// 스탑/트리거 주문은 `params`의 `stopPrice`/`triggerPrice`로 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

/// 주문 유효 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GTC, // Good Till Canceled
    GTD, // Good Till Date
    IOC, // Immediate Or Cancel
    FOK, // Fill Or Kill
    PO,  // Post Only
}

/// 주문 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// 최종 체결 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// 평균 체결가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
    /// 트리거가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<Decimal>,
    /// 체결 금액 (quote 화폐)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trades: Vec<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(default)]
    pub info: serde_json::Value,
}

impl Order {
    /// 파생 필드 계산
    ///
    /// remaining = amount - filled, cost = filled * average, average = cost / filled.
    /// 이미 있는 값은 덮어쓰지 않는다.
    pub fn complete(mut self) -> Self {
        if self.remaining.is_none() {
            if let (Some(amount), Some(filled)) = (self.amount, self.filled) {
                self.remaining = Some((amount - filled).max(Decimal::ZERO));
            }
        }
        if self.filled.is_none() {
            if let (Some(amount), Some(remaining)) = (self.amount, self.remaining) {
                self.filled = Some((amount - remaining).max(Decimal::ZERO));
            }
        }
        if self.average.is_none() {
            if let (Some(cost), Some(filled)) = (self.cost, self.filled) {
                if !filled.is_zero() {
                    self.average = Some(cost / filled);
                }
            }
        }
        if self.cost.is_none() {
            if let (Some(filled), Some(price)) = (self.filled, self.average.or(self.price)) {
                self.cost = Some(filled * price);
            }
        }
        if self.datetime.is_none() {
            self.datetime = self.timestamp.and_then(crate::utils::iso8601);
        }
        if self.post_only == Some(true) && self.time_in_force.is_none() {
            self.time_in_force = Some(TimeInForce::PO);
        }
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == Some(OrderStatus::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_complete_derives_remaining_and_cost() {
        let order = Order {
            id: "1".into(),
            amount: Some(dec!(2)),
            filled: Some(dec!(0.5)),
            price: Some(dec!(100)),
            status: Some(OrderStatus::Open),
            ..Default::default()
        }
        .complete();
        assert_eq!(order.remaining, Some(dec!(1.5)));
        assert_eq!(order.cost, Some(dec!(50.0)));
        assert!(order.is_open());
    }

    #[test]
    fn test_complete_derives_average_from_cost() {
        let order = Order {
            id: "2".into(),
            amount: Some(dec!(1)),
            remaining: Some(dec!(0)),
            cost: Some(dec!(250)),
            ..Default::default()
        }
        .complete();
        assert_eq!(order.filled, Some(dec!(1)));
        assert_eq!(order.average, Some(dec!(250)));
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(OrderSide::parse("BUY"), Some(OrderSide::Buy));
        assert_eq!(OrderSide::parse("ask"), Some(OrderSide::Sell));
        assert_eq!(OrderSide::parse("UNKNOWN_ORDER_SIDE"), None);
    }
}
