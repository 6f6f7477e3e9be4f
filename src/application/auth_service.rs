use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::AdminCredentials;
use crate::infrastructure::token::{AdminClaims, TokenCodec, TokenError};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Could not issue token: {0}")]
    Token(#[from] TokenError),
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Checks the single configured admin login and issues or verifies its tokens.
#[derive(Clone)]
pub struct AuthService {
    credentials: AdminCredentials,
    codec: TokenCodec,
    ttl: Duration,
}

impl AuthService {
    pub fn new(credentials: AdminCredentials, codec: TokenCodec, ttl_secs: i64) -> Self {
        Self {
            credentials,
            codec,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        // Compare digests so the check does not short-circuit on the first differing byte.
        let user_ok = digest(username) == digest(&self.credentials.username);
        let pass_ok = digest(password) == digest(self.credentials.password.expose_secret());
        if !(user_ok && pass_ok) {
            log::warn!("Rejected admin login for '{username}'");
            return Err(AuthError::InvalidCredentials);
        }

        let expires_at = now + self.ttl;
        let claims = AdminClaims {
            sub: self.credentials.username.clone(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.codec.sign(&claims)?;
        log::info!("Admin '{}' logged in", claims.sub);
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AdminClaims, TokenError> {
        let claims = self.codec.verify(token, now.timestamp())?;
        if claims.role != ADMIN_ROLE {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
