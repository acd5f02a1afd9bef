//! Request authentication
//!
//! - [`signer`]: HMAC/JWT/bearer 서명 방식 선택과 서명 값 계산
//! - [`jwt`]: Coinbase CDP ES256 토큰

pub mod jwt;
pub mod signer;

pub use signer::{Credentials, SigningScheme};
