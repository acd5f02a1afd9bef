//! Precision utilities
//!
//! 마켓 정밀도는 모두 tick size(예: `0.01`)로 표현한다. 자릿수만 주는 거래소는
//! [`precision_from_digits`]로 tick으로 바꿔서 저장한다.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Rounding modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round towards zero
    Truncate,
    /// Round to nearest, ties away from zero
    Round,
    /// Round towards positive infinity
    Up,
}

/// 자릿수 → tick size (`2` → `0.01`, `0` → `1`, `-1` → `10`)
pub fn precision_from_digits(digits: i32) -> Decimal {
    if digits >= 0 {
        Decimal::new(1, digits.min(28) as u32)
    } else {
        Decimal::from(10i64.pow(digits.unsigned_abs().min(18)))
    }
}

/// tick size → 소수 자릿수 (`0.0050` → 3)
pub fn digits_from_tick(tick: Decimal) -> u32 {
    tick.normalize().scale()
}

/// tick 배수로 맞춘 값
pub fn round_to_tick(value: Decimal, tick: Decimal, mode: RoundingMode) -> Decimal {
    if tick.is_zero() {
        return value;
    }
    let steps = value / tick;
    let steps = match mode {
        RoundingMode::Truncate => steps.trunc(),
        RoundingMode::Round => steps.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        RoundingMode::Up => steps.ceil(),
    };
    (steps * tick).normalize()
}

/// tick 배수로 맞춘 값을 tick 자릿수 문자열로
pub fn decimal_to_precision(value: Decimal, tick: Decimal, mode: RoundingMode) -> String {
    let rounded = round_to_tick(value, tick, mode);
    let places = digits_from_tick(tick);
    let mut fixed = rounded;
    fixed.rescale(places);
    let s = fixed.to_string();
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Amount to precision - 수량은 버림
pub fn amount_to_precision(amount: Decimal, tick: Option<Decimal>) -> String {
    match tick {
        Some(t) => decimal_to_precision(amount, t, RoundingMode::Truncate),
        None => amount.normalize().to_string(),
    }
}

/// Price to precision - 가격은 반올림
pub fn price_to_precision(price: Decimal, tick: Option<Decimal>) -> String {
    match tick {
        Some(t) => decimal_to_precision(price, t, RoundingMode::Round),
        None => price.normalize().to_string(),
    }
}

/// Cost to precision - 비용은 반올림
pub fn cost_to_precision(cost: Decimal, tick: Option<Decimal>) -> String {
    price_to_precision(cost, tick)
}
