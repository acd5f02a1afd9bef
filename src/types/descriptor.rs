//! Exchange descriptor
//!
//! 어댑터별 불변 기술자. 엔드포인트 가중치, 수수료, 캔들 주기 이름, 벤더 오류
//! 테이블, 화폐 별칭, URL, 옵션을 한 값으로 묶는다. 생성 후에는 변경하지 않는다.

use serde_json::Value;
use std::collections::HashMap;

use super::{ExchangeFeatures, ExchangeId, ExchangeUrls, FeeSchedule, Params, Timeframe};
use crate::client::ExchangeConfig;
use crate::errors::{CcxtError, CcxtResult, ExceptionTable};

/// 거래소 기술자
#[derive(Debug, Clone)]
pub struct ExchangeDescriptor {
    pub id: ExchangeId,
    pub name: String,
    pub version: String,
    /// 요청 간 최소 간격 (밀리초)
    pub rate_limit_ms: u64,
    pub features: ExchangeFeatures,
    pub urls: ExchangeUrls,
    pub timeframes: HashMap<Timeframe, String>,
    pub fees: FeeSchedule,
    pub exceptions: ExceptionTable,
    /// 거래소 화폐 코드 → 통합 코드 별칭
    pub common_currencies: HashMap<String, String>,
    /// `"<api> <METHOD> <path>"` → 가중치
    pub endpoint_costs: HashMap<String, f64>,
    pub options: Value,
    /// 모든 요청에 붙는 고정 헤더
    pub headers: HashMap<String, String>,
}

impl ExchangeDescriptor {
    /// 기본값으로 기술자 생성
    pub fn new(id: ExchangeId, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
            rate_limit_ms: 1000,
            features: ExchangeFeatures::default(),
            urls: ExchangeUrls::default(),
            timeframes: HashMap::new(),
            fees: FeeSchedule::default(),
            exceptions: ExceptionTable::new(),
            common_currencies: HashMap::new(),
            endpoint_costs: HashMap::new(),
            options: Value::Object(Default::default()),
            headers: HashMap::new(),
        }
    }

    /// 거래소 화폐 ID → 통합 코드 (대문자 + 별칭)
    pub fn safe_currency_code(&self, currency_id: &str) -> String {
        let upper = currency_id.to_uppercase();
        self.common_currencies.get(&upper).cloned().unwrap_or(upper)
    }

    /// 엔드포인트 가중치 (기본 1)
    pub fn cost(&self, api: &str, method: &str, path: &str) -> f64 {
        let key = format!("{api} {} {path}", method.to_uppercase());
        self.endpoint_costs.get(&key).copied().unwrap_or(1.0)
    }

    /// 통합 주기 → 거래소 주기 이름
    pub fn timeframe(&self, timeframe: Timeframe) -> CcxtResult<&str> {
        self.timeframes
            .get(&timeframe)
            .map(String::as_str)
            .ok_or_else(|| CcxtError::BadRequest {
                message: format!("{} does not support timeframe {}", self.id, timeframe.as_str()),
            })
    }

    /// 옵션 조회. 인스턴스 설정의 값이 기술자 기본값보다 우선한다.
    pub fn option(&self, overrides: &Params, key: &str) -> Option<Value> {
        overrides
            .get(key)
            .or_else(|| self.options.get(key))
            .filter(|v| !v.is_null())
            .cloned()
    }

    /// 문자열 옵션
    pub fn option_str(&self, overrides: &Params, key: &str) -> Option<String> {
        self.option(overrides, key)
            .and_then(|v| v.as_str().map(String::from))
    }

    /// bool 옵션
    pub fn option_bool(&self, overrides: &Params, key: &str) -> Option<bool> {
        self.option(overrides, key).and_then(|v| v.as_bool())
    }

    /// API 계열의 기본 URL
    ///
    /// 샌드박스면 `test` 테이블을 쓰고, `{hostname}`을 치환한 뒤 `url_override`가
    /// 있으면 scheme과 host만 교체한다.
    pub fn api_url(&self, family: &str, config: &ExchangeConfig) -> CcxtResult<String> {
        let table = if config.is_sandbox() {
            if self.urls.test.is_empty() {
                return Err(CcxtError::not_supported(format!("{} sandbox", self.id)));
            }
            &self.urls.test
        } else {
            &self.urls.api
        };
        let url = table.get(family).ok_or_else(|| CcxtError::ExchangeError {
            message: format!("{} has no url for api {family}", self.id),
        })?;
        let hostname = config
            .hostname()
            .map(String::from)
            .or_else(|| self.option_str(config.options(), "hostname"))
            .unwrap_or_default();
        let url = url.replace("{hostname}", &hostname);
        Ok(match config.url_override() {
            Some(base) => replace_origin(&url, base),
            None => url,
        })
    }
}

/// `https://host/path` 의 origin 부분을 `base`로 교체
fn replace_origin(url: &str, base: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = without_scheme
        .find('/')
        .map(|idx| &without_scheme[idx..])
        .unwrap_or("");
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> ExchangeDescriptor {
        let mut d = ExchangeDescriptor::new(ExchangeId::Woo, "WOO X", "v1");
        d.urls.api.insert("v1private".into(), "https://api.{hostname}/v1".into());
        d.common_currencies.insert("CGLD".into(), "CELO".into());
        d.endpoint_costs.insert("v1private GET asset/history".into(), 60.0);
        d.options = json!({ "hostname": "woo.org", "brokerId": "abc" });
        d
    }

    #[test]
    fn test_currency_alias() {
        let d = descriptor();
        assert_eq!(d.safe_currency_code("cgld"), "CELO");
        assert_eq!(d.safe_currency_code("btc"), "BTC");
    }

    #[test]
    fn test_cost_defaults_to_one() {
        let d = descriptor();
        assert_eq!(d.cost("v1private", "get", "asset/history"), 60.0);
        assert_eq!(d.cost("v1private", "GET", "orders"), 1.0);
    }

    #[test]
    fn test_config_options_win() {
        let d = descriptor();
        let mut overrides = Params::new();
        overrides.insert("brokerId".into(), json!("mine"));
        assert_eq!(d.option_str(&overrides, "brokerId").as_deref(), Some("mine"));
        assert_eq!(d.option_str(&Params::new(), "brokerId").as_deref(), Some("abc"));
    }

    #[test]
    fn test_api_url_hostname_and_override() {
        let d = descriptor();
        let config = ExchangeConfig::new();
        assert_eq!(d.api_url("v1private", &config).unwrap(), "https://api.woo.org/v1");

        let config = ExchangeConfig::new().with_url_override("http://127.0.0.1:9000");
        assert_eq!(d.api_url("v1private", &config).unwrap(), "http://127.0.0.1:9000/v1");

        let config = ExchangeConfig::new().with_sandbox(true);
        assert!(matches!(
            d.api_url("v1private", &config),
            Err(CcxtError::NotSupported { .. })
        ));
    }
}
