//! Compact HS256-signed admin tokens (JWT layout).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried by an admin token. Nothing is stored server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("signing key is unusable")]
    InvalidKey,
}

fn header_alg(bytes: &[u8]) -> Result<String, TokenError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| TokenError::Malformed)?;
    value
        .get("alg")
        .and_then(|a| a.as_str())
        .map(str::to_string)
        .ok_or(TokenError::Malformed)
}

#[derive(Clone)]
pub struct TokenCodec {
    secret: SecretString,
}

impl TokenCodec {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)
    }

    pub fn sign(&self, claims: &AdminClaims) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Check signature and expiry against `now` (unix seconds).
    pub fn verify(&self, token: &str, now: i64) -> Result<AdminClaims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenError::Malformed)?;
        if header_alg(&header_bytes)? != "HS256" {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: AdminClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(SecretString::from(secret.to_string()))
    }

    fn claims(exp: i64) -> AdminClaims {
        AdminClaims {
            sub: "admin".to_string(),
            role: "admin".to_string(),
            iat: 1_000,
            exp,
        }
    }

    #[test]
    fn signed_token_verifies_before_expiry() {
        let codec = codec("0123456789abcdef0123456789abcdef");
        let token = codec.sign(&claims(2_000)).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.verify(&token, 1_500).unwrap(), claims(2_000));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec("0123456789abcdef0123456789abcdef");
        let token = codec.sign(&claims(2_000)).unwrap();
        assert_eq!(codec.verify(&token, 2_000), Err(TokenError::Expired));
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = codec("key-one-key-one-key-one-key-one!").sign(&claims(2_000)).unwrap();
        let err = codec("key-two-key-two-key-two-key-two!")
            .verify(&token, 1_500)
            .unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec("0123456789abcdef0123456789abcdef");
        let token = codec.sign(&claims(2_000)).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims(9_999)).unwrap());
        parts[1] = &forged;
        let forged_token = parts.join(".");
        assert_eq!(codec.verify(&forged_token, 1_500), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec("0123456789abcdef0123456789abcdef");
        assert_eq!(codec.verify("not-a-token", 0), Err(TokenError::Malformed));
        assert_eq!(codec.verify("a.b.c.d", 0), Err(TokenError::Malformed));
    }
}
