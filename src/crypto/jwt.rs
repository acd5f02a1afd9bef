//! JWT (JSON Web Token) Utilities
//!
//! Coinbase CDP API 키용 ES256 bearer token 생성.
//! CDP 키는 SEC1(`EC PRIVATE KEY`) PEM으로 배포되므로 PKCS#8로 바꾼 뒤 서명한다.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{Algorithm, EncodingKey};
use p256::pkcs8::EncodePrivateKey;
use p256::SecretKey;
use serde::{Deserialize, Serialize};

use crate::errors::{CcxtError, CcxtResult};
use crate::utils::now_secs;

/// 토큰 유효 기간 (초)
pub const TOKEN_TTL_SECS: i64 = 120;

/// JWT 헤더
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
    pub nonce: String,
}

/// CDP 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpClaims {
    pub iss: String,
    pub sub: String,
    pub nbf: i64,
    pub exp: i64,
    /// `"METHOD host/path"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl CdpClaims {
    pub fn new(api_key: &str, uri: Option<String>) -> Self {
        let now = now_secs();
        Self {
            iss: "cdp".into(),
            sub: api_key.into(),
            nbf: now,
            exp: now + TOKEN_TTL_SECS,
            uri,
        }
    }
}

/// ES256 토큰 생성
///
/// `private_key`는 SEC1 또는 PKCS#8 PEM. 설정 파일에서 온 리터럴 `\n`도 받는다.
pub fn encode_es256(api_key: &str, private_key: &str, uri: Option<String>) -> CcxtResult<String> {
    let key = ec_encoding_key(private_key)?;
    let header = JwtHeader {
        alg: "ES256".into(),
        typ: "JWT".into(),
        kid: api_key.into(),
        nonce: random_nonce(),
    };
    let claims = CdpClaims::new(api_key, uri);

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    );
    let signature = jsonwebtoken::crypto::sign(signing_input.as_bytes(), &key, Algorithm::ES256)
        .map_err(|e| CcxtError::AuthenticationError {
            message: format!("JWT encoding failed: {e}"),
        })?;

    Ok(format!("{signing_input}.{signature}"))
}

/// PEM 문자열이 EC private key인지
pub fn is_ec_private_key(secret: &str) -> bool {
    secret.contains("PRIVATE KEY")
}

fn ec_encoding_key(pem: &str) -> CcxtResult<EncodingKey> {
    let pem = pem.replace("\\n", "\n");
    if !pem.contains("BEGIN EC PRIVATE KEY") {
        return EncodingKey::from_ec_pem(pem.as_bytes()).map_err(|e| CcxtError::InvalidPrivateKey {
            message: format!("invalid EC private key: {e}"),
        });
    }
    let key = SecretKey::from_sec1_pem(&pem).map_err(|e| CcxtError::InvalidPrivateKey {
        message: format!("invalid SEC1 private key: {e}"),
    })?;
    let der = key.to_pkcs8_der().map_err(|e| CcxtError::InvalidPrivateKey {
        message: format!("PKCS#8 conversion failed: {e}"),
    })?;
    Ok(EncodingKey::from_ec_der(der.as_bytes()))
}

/// 16자리 hex nonce
fn random_nonce() -> String {
    let mut nonce = uuid::Uuid::new_v4().simple().to_string();
    nonce.truncate(16);
    nonce
}
