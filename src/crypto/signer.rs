//! Request signing schemes
//!
//! 어댑터는 거래소별 canonical string을 만들고, 서명 값은 여기서 계산한다.
//! 인증 정보가 없으면 네트워크 호출 전에 `AuthenticationError`로 끝난다.

use crate::client::ExchangeConfig;
use crate::errors::{CcxtError, CcxtResult};
use crate::utils::crypto::{hmac_sha256_hex, hmac_sha512_hex};

use super::jwt;

/// 서명 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// canonical string의 HMAC-SHA256 hex
    HmacSha256Hex,
    /// base64 payload의 HMAC-SHA512 hex
    HmacSha512Payload,
    /// CDP ES256 bearer token
    JwtEs256,
    /// 정적 OAuth bearer token
    Bearer,
}

/// 설정에서 빌린 인증 정보
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub api_key: &'a str,
    pub secret: &'a str,
}

impl<'a> Credentials<'a> {
    /// apiKey/secret이 모두 있어야 한다
    pub fn require(config: &'a ExchangeConfig, exchange_id: &str) -> CcxtResult<Self> {
        let (api_key, secret) = crate::require_credentials!(config, exchange_id)?;
        Ok(Self { api_key, secret })
    }
}

impl SigningScheme {
    /// 인증 정보 모양에 따른 Coinbase 서명 방식
    ///
    /// apiKey/secret이 없고 token만 있으면 Bearer, secret이 EC private key면 JWT.
    pub fn for_coinbase(config: &ExchangeConfig) -> Self {
        let has_key_pair = config.api_key().is_some_and(|k| !k.is_empty())
            && config.secret().is_some_and(|s| !s.is_empty());
        match (has_key_pair, config.token()) {
            (false, Some(token)) if !token.is_empty() => SigningScheme::Bearer,
            _ if config.secret().is_some_and(jwt::is_ec_private_key) => SigningScheme::JwtEs256,
            _ => SigningScheme::HmacSha256Hex,
        }
    }

    /// 서명 값 계산
    ///
    /// HMAC 방식은 `payload`가 canonical string, JWT는 `"METHOD host/path"` uri.
    pub fn signature(&self, credentials: &Credentials<'_>, payload: &str) -> CcxtResult<String> {
        match self {
            SigningScheme::HmacSha256Hex => hmac_sha256_hex(credentials.secret, payload),
            SigningScheme::HmacSha512Payload => hmac_sha512_hex(credentials.secret, payload),
            SigningScheme::JwtEs256 => {
                jwt::encode_es256(credentials.api_key, credentials.secret, Some(payload.to_string()))
            },
            SigningScheme::Bearer => Err(CcxtError::AuthenticationError {
                message: "bearer tokens are not computed per request".into(),
            }),
        }
    }
}
