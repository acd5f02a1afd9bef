//! Safe helper functions for extracting values from JSON
//!
//! CCXT의 safe* 헬퍼. 키는 객체 필드(`&str`)나 배열 인덱스(`usize`) 모두 가능하고,
//! 없거나 null이거나 형식이 다르면 None을 돌려준다. 절대 panic 하지 않는다.

use rust_decimal::Decimal;
use serde_json::value::Index;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::time::parse8601;

fn present<K: Index>(obj: &Value, key: K) -> Option<&Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// 문자열 → Decimal (지수 표기 허용)
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// 안전한 문자열 추출
pub fn safe_string<K: Index>(obj: &Value, key: K) -> Option<String> {
    present(obj, key).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// 두 키 중 하나에서 문자열 추출
pub fn safe_string2(obj: &Value, key1: &str, key2: &str) -> Option<String> {
    safe_string(obj, key1).or_else(|| safe_string(obj, key2))
}

/// N개 키 중 하나에서 문자열 추출
pub fn safe_string_n(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| safe_string(obj, *k))
}

/// 소문자 문자열 추출
pub fn safe_string_lower<K: Index>(obj: &Value, key: K) -> Option<String> {
    safe_string(obj, key).map(|s| s.to_lowercase())
}

/// 대문자 문자열 추출
pub fn safe_string_upper<K: Index>(obj: &Value, key: K) -> Option<String> {
    safe_string(obj, key).map(|s| s.to_uppercase())
}

/// 안전한 정수 추출 (소수부 버림)
pub fn safe_integer<K: Index>(obj: &Value, key: K) -> Option<i64> {
    present(obj, key).and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| parse_decimal(s).and_then(|d| i64::try_from(d.trunc()).ok())),
        _ => None,
    })
}

/// N개 키 중 하나에서 정수 추출
pub fn safe_integer_n(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| safe_integer(obj, *k))
}

/// 정수 * 배수
pub fn safe_integer_product<K: Index>(obj: &Value, key: K, factor: i64) -> Option<i64> {
    safe_decimal(obj, key).and_then(|d| i64::try_from((d * Decimal::from(factor)).trunc()).ok())
}

/// 안전한 Decimal 추출
pub fn safe_decimal<K: Index>(obj: &Value, key: K) -> Option<Decimal> {
    present(obj, key).and_then(|v| match v {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

/// N개 키 중 하나에서 Decimal 추출
pub fn safe_decimal_n(obj: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| safe_decimal(obj, *k))
}

/// 초 단위 값을 밀리초 타임스탬프로 추출
pub fn safe_timestamp<K: Index>(obj: &Value, key: K) -> Option<i64> {
    safe_integer_product(obj, key, 1000)
}

/// N개 키 중 하나에서 초 단위 타임스탬프 추출
pub fn safe_timestamp_n(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| safe_timestamp(obj, *k))
}

/// ISO 8601 문자열 필드를 밀리초로
pub fn safe_iso8601<K: Index>(obj: &Value, key: K) -> Option<i64> {
    safe_string(obj, key).and_then(|s| parse8601(&s))
}

/// 안전한 값 추출
pub fn safe_value<K: Index>(obj: &Value, key: K) -> Option<&Value> {
    present(obj, key)
}

/// N개 키 중 하나에서 값 추출
pub fn safe_value_n<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| present(obj, *k))
}

/// 배열 필드
pub fn safe_list<K: Index>(obj: &Value, key: K) -> Option<&Vec<Value>> {
    present(obj, key).and_then(Value::as_array)
}

/// 객체 필드
pub fn safe_dict<K: Index>(obj: &Value, key: K) -> Option<&Map<String, Value>> {
    present(obj, key).and_then(Value::as_object)
}

/// 안전한 불린 추출
pub fn safe_bool<K: Index>(obj: &Value, key: K) -> Option<bool> {
    present(obj, key).and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    })
}

/// Decimal → JSON 문자열 값
pub fn decimal_value(d: Decimal) -> Value {
    Value::String(d.normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_string_from_any_scalar() {
        let v = json!({"a": "x", "b": 1.5, "c": true, "d": null, "e": {"k": 1}});
        assert_eq!(safe_string(&v, "a").as_deref(), Some("x"));
        assert_eq!(safe_string(&v, "b").as_deref(), Some("1.5"));
        assert_eq!(safe_string(&v, "c").as_deref(), Some("true"));
        assert_eq!(safe_string(&v, "d"), None);
        assert_eq!(safe_string(&v, "e"), None);
        assert_eq!(safe_string(&v, "missing"), None);
        assert_eq!(safe_string_n(&v, &["missing", "d", "a"]).as_deref(), Some("x"));
    }

    #[test]
    fn test_array_index_keys() {
        let row = json!([1700000000, "1.5", "2.5"]);
        assert_eq!(safe_timestamp(&row, 0), Some(1_700_000_000_000));
        assert_eq!(safe_decimal(&row, 1), Some(dec!(1.5)));
        assert_eq!(safe_decimal(&row, 9), None);
        assert_eq!(safe_string(&json!("scalar"), 0), None);
    }

    #[test]
    fn test_timestamp_accepts_fractional_seconds() {
        let v = json!({"t": "1752055173.630", "n": 1752055173});
        assert_eq!(safe_timestamp(&v, "t"), Some(1_752_055_173_630));
        assert_eq!(safe_timestamp(&v, "n"), Some(1_752_055_173_000));
        assert_eq!(safe_integer(&v, "t"), Some(1_752_055_173));
    }

    #[test]
    fn test_decimal_parsing() {
        let v = json!({"a": "0.00010", "b": "1e-8", "c": "", "d": "abc", "e": 42});
        assert_eq!(safe_decimal(&v, "a"), Some(dec!(0.0001)));
        assert_eq!(safe_decimal(&v, "b"), Some(dec!(0.00000001)));
        assert_eq!(safe_decimal(&v, "c"), None);
        assert_eq!(safe_decimal(&v, "d"), None);
        assert_eq!(safe_decimal(&v, "e"), Some(dec!(42)));
    }

    #[test]
    fn test_bool_and_containers() {
        let v = json!({"a": "true", "b": 0, "l": [1, 2], "o": {"x": 1}});
        assert_eq!(safe_bool(&v, "a"), Some(true));
        assert_eq!(safe_bool(&v, "b"), Some(false));
        assert_eq!(safe_list(&v, "l").map(Vec::len), Some(2));
        assert!(safe_list(&v, "o").is_none());
        assert!(safe_dict(&v, "o").is_some());
    }

    #[test]
    fn test_iso8601_field() {
        let v = json!({"created_at": "2024-01-01T00:00:00.123Z"});
        assert_eq!(safe_iso8601(&v, "created_at"), Some(1_704_067_200_123));
    }
}
