//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_PASSWORD` - Password of the single admin account
//! - `JWT_SECRET` - Admin token signing secret (min 32 chars)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8080)
//! - `DATABASE_URL` - `PostgreSQL` connection string; in-memory storage when unset
//! - `ADMIN_USERNAME` - Admin login name (default: admin)
//! - `TOKEN_TTL_SECS` - Admin token lifetime (default: 3600)
//! - `SHIPPING_FEE` - Flat shipping fee per order (default: 5.00)
//!
//! ## Optional (SMTP - all of host, username, password and from, or none)
//! - `SMTP_HOST`, `SMTP_PORT` (default: 587), `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::domain::pricing::DEFAULT_SHIPPING_FEE;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` selects the in-memory repositories.
    pub database_url: Option<SecretString>,
    pub admin: AdminCredentials,
    pub jwt_secret: SecretString,
    pub token_ttl_secs: i64,
    pub shipping_fee: BigDecimal,
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let port = parse_or(get("PORT"), "PORT", 8080u16)?;
        let token_ttl_secs = parse_or(get("TOKEN_TTL_SECS"), "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TOKEN_TTL_SECS".to_string(),
                "must be positive".to_string(),
            ));
        }

        let shipping_fee = get("SHIPPING_FEE").unwrap_or_else(|| DEFAULT_SHIPPING_FEE.to_string());
        let shipping_fee = BigDecimal::from_str(shipping_fee.trim())
            .map_err(|e| ConfigError::InvalidEnvVar("SHIPPING_FEE".to_string(), e.to_string()))?;
        if shipping_fee < BigDecimal::zero() {
            return Err(ConfigError::InvalidEnvVar(
                "SHIPPING_FEE".to_string(),
                "cannot be negative".to_string(),
            ));
        }

        let jwt_secret = SecretString::from(require("JWT_SECRET")?);
        if jwt_secret.expose_secret().len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "JWT_SECRET".to_string(),
                format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
            ));
        }

        let email = match get("SMTP_HOST") {
            Some(smtp_host) => Some(EmailConfig {
                smtp_host,
                smtp_port: parse_or(get("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                smtp_username: require("SMTP_USERNAME")?,
                smtp_password: SecretString::from(require("SMTP_PASSWORD")?),
                from_address: require("SMTP_FROM")?,
            }),
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: get("DATABASE_URL").map(SecretString::from),
            admin: AdminCredentials {
                username: get("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password: SecretString::from(require("ADMIN_PASSWORD")?),
            },
            jwt_secret,
            token_ttl_secs,
            shipping_fee,
            email,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "an-adequately-long-signing-secret-value";

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config =
            AppConfig::from_lookup(lookup(&[("ADMIN_PASSWORD", "pw"), ("JWT_SECRET", SECRET)]))
                .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.shipping_fee, BigDecimal::from_str("5.00").unwrap());
        assert!(config.database_url.is_none());
        assert!(config.email.is_none());
    }

    #[test]
    fn missing_admin_password_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "ADMIN_PASSWORD"));
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("ADMIN_PASSWORD", "pw"), ("JWT_SECRET", "short")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(..)));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "pw"),
            ("JWT_SECRET", SECRET),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "PORT"));
    }

    #[test]
    fn smtp_host_requires_the_rest_of_the_smtp_settings() {
        let err = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "pw"),
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", "smtp.example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "SMTP_USERNAME"));

        let config = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "pw"),
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "pw"),
            ("SMTP_FROM", "shop@example.com"),
        ]))
        .unwrap();
        let email = config.email.unwrap();
        assert_eq!(email.smtp_port, 587);
        assert_eq!(email.from_address, "shop@example.com");
    }

    #[test]
    fn negative_shipping_fee_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "pw"),
            ("JWT_SECRET", SECRET),
            ("SHIPPING_FEE", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "SHIPPING_FEE"));
    }
}
