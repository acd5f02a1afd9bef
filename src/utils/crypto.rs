//! Cryptographic utilities for API signing

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::errors::{CcxtError, CcxtResult};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

fn key_error(e: hmac::digest::InvalidLength) -> CcxtError {
    CcxtError::AuthenticationError {
        message: format!("HMAC key error: {e}"),
    }
}

/// HMAC-SHA256 서명 생성
pub fn hmac_sha256(secret: &[u8], message: &[u8]) -> CcxtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(key_error)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256 서명을 hex 문자열로 반환
pub fn hmac_sha256_hex(secret: &str, message: &str) -> CcxtResult<String> {
    hmac_sha256(secret.as_bytes(), message.as_bytes()).map(hex::encode)
}

/// HMAC-SHA512 서명을 hex 문자열로 반환
pub fn hmac_sha512_hex(secret: &str, message: &str) -> CcxtResult<String> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).map_err(key_error)?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Base64 인코딩
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Base64 디코딩
pub fn base64_decode(data: &str) -> CcxtResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| CcxtError::ParseError {
            data_type: "base64".into(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2
    #[test]
    fn test_hmac_sha256_known_vector() {
        let sig = hmac_sha256_hex("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hmac_sha512_known_vector() {
        let sig = hmac_sha512_hex("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_base64_round_trip() {
        let encoded = base64_encode(b"{\"a\":1}");
        assert_eq!(encoded, "eyJhIjoxfQ==");
        assert_eq!(base64_decode(&encoded).unwrap(), b"{\"a\":1}");
    }
}
