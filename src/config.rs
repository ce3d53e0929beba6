//! Application configuration.
//!
//! Values come from a key lookup: the shuttle secret store when deployed,
//! the process environment for the seed binary.

use std::{str::FromStr, time::Duration};

use axum::http::HeaderValue;
use thiserror::Error;

use crate::auth::{jwt::DEFAULT_TOKEN_EXPIRY_SECS, JwtConfig};
use crate::booking::{admission::DEFAULT_LOCK_TIMEOUT, AdmissionConfig};
use crate::db::DEFAULT_DB_NAME;

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub db_name: String,
    /// Allowed CORS origin
    pub app_url: String,
    pub jwt: JwtConfig,
    pub admission: AdmissionConfig,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let app_url = lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        if HeaderValue::from_str(&app_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "APP_URL",
                value: app_url,
            });
        }

        let token_expiry = parse_or(&lookup, "JWT_EXPIRY_SECS", DEFAULT_TOKEN_EXPIRY_SECS)?;
        let scope_by_date = parse_or(&lookup, "BOOKING_SCOPE_BY_DATE", false)?;
        let lock_timeout_ms = parse_or(
            &lookup,
            "BOOKING_LOCK_TIMEOUT_MS",
            DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
        )?;

        Ok(AppConfig {
            mongodb_uri: required("MONGODB_URI")?,
            db_name: lookup("MONGODB_DB").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            app_url,
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                token_expiry,
            },
            admission: AdmissionConfig {
                scope_by_date,
                lock_timeout: Duration::from_millis(lock_timeout_ms),
            },
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn cors_origin(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.app_url).map_err(|_| ConfigError::Invalid {
            key: "APP_URL",
            value: self.app_url.clone(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.db_name, DEFAULT_DB_NAME);
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert_eq!(config.jwt.token_expiry, DEFAULT_TOKEN_EXPIRY_SECS);
        assert_eq!(config.admission, AdmissionConfig::default());
        assert!(config.cors_origin().is_ok());
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DB", "bookings-test"),
            ("JWT_SECRET", "secret"),
            ("JWT_EXPIRY_SECS", "60"),
            ("BOOKING_SCOPE_BY_DATE", "true"),
            ("BOOKING_LOCK_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.db_name, "bookings-test");
        assert_eq!(config.jwt.token_expiry, 60);
        assert!(config.admission.scope_by_date);
        assert_eq!(config.admission.lock_timeout, Duration::from_millis(250));
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[("MONGODB_URI", "mongodb://db")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn bad_flag_is_invalid() {
        let err = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db"),
            ("JWT_SECRET", "secret"),
            ("BOOKING_SCOPE_BY_DATE", "sometimes"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "BOOKING_SCOPE_BY_DATE",
                value: "sometimes".to_string()
            }
        );
    }
}
