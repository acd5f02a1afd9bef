//! Time utilities

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// 현재 UTC 타임스탬프 (밀리초)
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// 현재 UTC 타임스탬프 (초)
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// 밀리초 → `2024-01-01T00:00:00.000Z`
pub fn iso8601(ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// ISO 8601 / RFC 3339 문자열 → 밀리초
///
/// 나노초 자릿수(`.123456789Z`)와 오프셋 없는 형식도 받는다.
pub fn parse8601(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// `YYMMDD` 만기 → 밀리초 (UTC 자정)
pub fn yymmdd_to_ms(s: &str) -> Option<i64> {
    NaiveDate::parse_from_str(s, "%y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// 밀리초 → `YYMMDD`
pub fn ms_to_yymmdd(ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.format("%y%m%d").to_string())
}
