//! Precise - decimal-string arithmetic
//!
//! 문자열로 들어온 가격/수량을 부동소수점 없이 더하고 빼고 곱하고 나눈다.
//! 값은 `integer * 10^-decimals` 로 보관한다.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 나눗셈 기본 자릿수
pub const DEFAULT_DIV_PRECISION: i32 = 18;

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10).pow(exp)
}

/// Arbitrary precision decimal
#[derive(Clone, Debug)]
pub struct Precise {
    integer: BigInt,
    decimals: i32,
}

/// 파싱 실패
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePreciseError(pub String);

impl fmt::Display for ParsePreciseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal string: {}", self.0)
    }
}

impl std::error::Error for ParsePreciseError {}

impl FromStr for Precise {
    type Err = ParsePreciseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s.trim().to_lowercase();
        if number.is_empty() {
            return Err(ParsePreciseError(s.to_string()));
        }
        let (mantissa, exponent) = match number.split_once('e') {
            Some((m, e)) => (
                m.to_string(),
                e.parse::<i32>()
                    .map_err(|_| ParsePreciseError(s.to_string()))?,
            ),
            None => (number, 0),
        };
        let decimals = mantissa
            .find('.')
            .map(|idx| (mantissa.len() - idx - 1) as i32)
            .unwrap_or(0);
        let digits = mantissa.replacen('.', "", 1);
        let integer =
            BigInt::from_str(&digits).map_err(|_| ParsePreciseError(s.to_string()))?;
        Ok(Precise {
            integer,
            decimals: decimals - exponent,
        })
    }
}

impl Precise {
    pub fn new(integer: BigInt, decimals: i32) -> Self {
        Precise { integer, decimals }
    }

    pub fn is_zero(&self) -> bool {
        self.integer.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.integer.is_negative()
    }

    pub fn mul(&self, other: &Precise) -> Precise {
        Precise::new(&self.integer * &other.integer, self.decimals + other.decimals)
    }

    /// 결과를 `precision` 자리에서 버림
    pub fn div(&self, other: &Precise, precision: i32) -> Option<Precise> {
        if other.is_zero() {
            return None;
        }
        let distance = precision - self.decimals + other.decimals;
        let numerator = match distance.cmp(&0) {
            Ordering::Equal => self.integer.clone(),
            Ordering::Less => &self.integer / pow10(distance.unsigned_abs()),
            Ordering::Greater => &self.integer * pow10(distance as u32),
        };
        Some(Precise::new(numerator / &other.integer, precision))
    }

    pub fn add(&self, other: &Precise) -> Precise {
        match self.decimals.cmp(&other.decimals) {
            Ordering::Equal => Precise::new(&self.integer + &other.integer, self.decimals),
            Ordering::Less => {
                let scaled = &self.integer * pow10((other.decimals - self.decimals) as u32);
                Precise::new(scaled + &other.integer, other.decimals)
            },
            Ordering::Greater => other.add(self),
        }
    }

    pub fn sub(&self, other: &Precise) -> Precise {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Precise {
        Precise::new(-&self.integer, self.decimals)
    }

    pub fn abs(&self) -> Precise {
        Precise::new(self.integer.abs(), self.decimals)
    }

    pub fn modulo(&self, other: &Precise) -> Option<Precise> {
        if other.is_zero() {
            return None;
        }
        let num_shift = (other.decimals - self.decimals).max(0) as u32;
        let den_shift = (self.decimals - other.decimals).max(0) as u32;
        let numerator = &self.integer * pow10(num_shift);
        let denominator = &other.integer * pow10(den_shift);
        Some(Precise::new(
            numerator % denominator,
            den_shift as i32 + other.decimals,
        ))
    }

    /// 끝자리 0 제거한 정규형
    pub fn reduced(&self) -> Precise {
        if self.integer.is_zero() {
            return Precise::new(BigInt::zero(), 0);
        }
        let ten = BigInt::from(10);
        let mut integer = self.integer.clone();
        let mut decimals = self.decimals;
        while (&integer % &ten).is_zero() {
            integer /= &ten;
            decimals -= 1;
        }
        Precise::new(integer, decimals)
    }
}

impl fmt::Display for Precise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reduced = self.reduced();
        let sign = if reduced.integer.is_negative() { "-" } else { "" };
        let digits = reduced.integer.abs().to_string();

        if reduced.decimals <= 0 {
            let zeros = "0".repeat(reduced.decimals.unsigned_abs() as usize);
            return write!(f, "{sign}{digits}{zeros}");
        }

        let scale = reduced.decimals as usize;
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl PartialEq for Precise {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Precise {}

impl PartialOrd for Precise {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Precise {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sub(other).integer.cmp(&BigInt::zero())
    }
}

// === string helpers ===
//
// 피연산자 중 하나라도 없거나 숫자가 아니면 None

fn parse(s: Option<&str>) -> Option<Precise> {
    s.and_then(|v| v.parse().ok())
}

pub fn string_add(a: Option<&str>, b: Option<&str>) -> Option<String> {
    Some(parse(a)?.add(&parse(b)?).to_string())
}

pub fn string_sub(a: Option<&str>, b: Option<&str>) -> Option<String> {
    Some(parse(a)?.sub(&parse(b)?).to_string())
}

pub fn string_mul(a: Option<&str>, b: Option<&str>) -> Option<String> {
    Some(parse(a)?.mul(&parse(b)?).to_string())
}

/// 18자리에서 버림. 0으로 나누면 None
pub fn string_div(a: Option<&str>, b: Option<&str>) -> Option<String> {
    string_div_with(a, b, DEFAULT_DIV_PRECISION)
}

pub fn string_div_with(a: Option<&str>, b: Option<&str>, precision: i32) -> Option<String> {
    Some(parse(a)?.div(&parse(b)?, precision)?.to_string())
}

pub fn string_mod(a: Option<&str>, b: Option<&str>) -> Option<String> {
    Some(parse(a)?.modulo(&parse(b)?)?.to_string())
}

pub fn string_neg(a: Option<&str>) -> Option<String> {
    Some(parse(a)?.neg().to_string())
}

pub fn string_abs(a: Option<&str>) -> Option<String> {
    Some(parse(a)?.abs().to_string())
}

pub fn string_eq(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    Some(parse(a)? == parse(b)?)
}

pub fn string_gt(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    Some(parse(a)? > parse(b)?)
}

pub fn string_ge(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    Some(parse(a)? >= parse(b)?)
}

pub fn string_lt(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    Some(parse(a)? < parse(b)?)
}

pub fn string_le(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    Some(parse(a)? <= parse(b)?)
}

pub fn string_min(a: Option<&str>, b: Option<&str>) -> Option<String> {
    let (x, y) = (parse(a)?, parse(b)?);
    Some(x.min(y).to_string())
}

pub fn string_max(a: Option<&str>, b: Option<&str>) -> Option<String> {
    let (x, y) = (parse(a)?, parse(b)?);
    Some(x.max(y).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_normalises() {
        let p: Precise = "0.00100".parse().unwrap();
        assert_eq!(p.to_string(), "0.001");
        let p: Precise = "-12.50".parse().unwrap();
        assert_eq!(p.to_string(), "-12.5");
        let p: Precise = "1.5e3".parse().unwrap();
        assert_eq!(p.to_string(), "1500");
        let p: Precise = "0".parse().unwrap();
        assert_eq!(p.to_string(), "0");
    }

    #[test]
    fn test_add_sub_inverse() {
        let cases = [("0.1", "0.2"), ("123.456", "-0.000789"), ("1e-8", "99999")];
        for (a, b) in cases {
            let diff = string_sub(Some(a), Some(b));
            let back = string_add(diff.as_deref(), Some(b));
            assert_eq!(string_eq(back.as_deref(), Some(a)), Some(true), "{a} {b}");
        }
    }

    #[test]
    fn test_mul_div_inverse_within_precision() {
        let q = string_div(Some("10"), Some("4"));
        assert_eq!(q.as_deref(), Some("2.5"));
        let back = string_mul(q.as_deref(), Some("4"));
        assert_eq!(back.as_deref(), Some("10"));

        // 1/3 truncates at 18 places
        let third = string_div(Some("1"), Some("3")).unwrap();
        assert_eq!(third, "0.333333333333333333");
        let back = string_mul(Some(&third), Some("3")).unwrap();
        assert_eq!(
            string_sub(Some("1"), Some(&back)).as_deref(),
            Some("0.000000000000000001")
        );
    }

    #[test]
    fn test_no_float_error() {
        assert_eq!(string_add(Some("0.1"), Some("0.2")).as_deref(), Some("0.3"));
    }

    #[test]
    fn test_missing_operand_is_none() {
        assert_eq!(string_add(None, Some("1")), None);
        assert_eq!(string_mul(Some("abc"), Some("1")), None);
        assert_eq!(string_div(Some("1"), Some("0")), None);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(string_gt(Some("0.010"), Some("0.01")), Some(false));
        assert_eq!(string_ge(Some("0.010"), Some("0.01")), Some(true));
        assert_eq!(string_lt(Some("-1"), Some("0")), Some(true));
        assert_eq!(string_min(Some("3"), Some("2.5")).as_deref(), Some("2.5"));
        assert_eq!(string_max(Some("3"), Some("2.5")).as_deref(), Some("3"));
        assert_eq!(string_neg(Some("2.5")).as_deref(), Some("-2.5"));
        assert_eq!(string_abs(Some("-2.5")).as_deref(), Some("2.5"));
        assert_eq!(string_mod(Some("10"), Some("3")).as_deref(), Some("1"));
    }
}
