//! HTTP client for API requests

use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

use super::ExchangeConfig;
use crate::errors::{CcxtError, CcxtResult};
use crate::types::{Params, SignedRequest};

/// HTTP 클라이언트
///
/// 벤더 응답 본문은 해석하지 않는다. 상태 코드와 본문을 그대로 돌려줘서
/// 어댑터의 오류 매퍼가 non-2xx 본문도 볼 수 있게 한다.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 새로운 HTTP 클라이언트 생성
    pub fn new(config: &ExchangeConfig) -> CcxtResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .build()
            .map_err(|e| CcxtError::NetworkError {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// 서명된 요청 실행
    pub async fn execute(&self, request: &SignedRequest) -> CcxtResult<(u16, String)> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            CcxtError::BadRequest {
                message: format!("invalid method {}: {e}", request.method),
            }
        })?;

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| CcxtError::NetworkError {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        Ok((status, body))
    }
}

/// 응답 본문 JSON 파싱 (빈 본문은 null)
pub fn parse_json(body: &str) -> CcxtResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| CcxtError::BadResponse {
        message: format!("invalid JSON response: {e}"),
    })
}

/// 파라미터 값을 쿼리/서명용 문자열로 변환
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `{placeholder}`를 파라미터로 치환하고 남은 파라미터를 돌려준다
pub fn implode_params(path: &str, params: &Params) -> (String, Params) {
    let mut path = path.to_string();
    let mut rest = Params::new();
    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &param_to_string(value));
        } else {
            rest.insert(key.clone(), value.clone());
        }
    }
    (path, rest)
}

/// 지정한 키를 뺀 파라미터 사본
pub fn omit(params: &Params, keys: &[&str]) -> Params {
    params
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// 키 순서대로 `k=v&k=v` 인코딩
pub fn urlencode(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k),
                urlencoding::encode(&param_to_string(v))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// 배열 값은 같은 키를 반복 (`ids=a&ids=b`)
pub fn urlencode_with_array_repeat(params: &Params) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{key}={}", urlencoding::encode(&param_to_string(item))));
                }
            },
            other => pairs.push(format!("{key}={}", urlencoding::encode(&param_to_string(other)))),
        }
    }
    pairs.join("&")
}

/// 쿼리 스트링이 비어 있지 않으면 `url?query`
pub fn with_query(url: &str, params: &Params) -> String {
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", urlencode(params))
    }
}
