//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_infra::JwtConfig;
use blog_infra::auth::{MAX_EXPIRATION_HOURS, MIN_SECRET_LEN};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET must be at least {} bytes", MIN_SECRET_LEN)]
    SecretTooShort,
}

/// Database settings; present only when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis settings; present only when `REDIS_URL` is set.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub connect_timeout: Duration,
    /// Use the in-memory cache when Redis is unreachable; otherwise run uncached.
    pub fallback_to_memory: bool,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub keep_alive: Duration,
    pub client_request_timeout: Duration,
    pub database: Option<DatabaseSettings>,
    pub redis: Option<RedisSettings>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => Some(DatabaseSettings {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 100)?,
                min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 10)?,
            }),
            None => None,
        };

        let redis = match lookup("REDIS_URL").filter(|s| !s.is_empty()) {
            Some(url) => Some(RedisSettings {
                url,
                connect_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "REDIS_CONNECT_TIMEOUT_SECS",
                    5u64,
                )?),
                fallback_to_memory: parse_bool(&lookup, "REDIS_FALLBACK_TO_MEMORY", true)?,
            }),
            None => None,
        };

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }
        let expiration_hours = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 12i64)?;
        if !(1..=MAX_EXPIRATION_HOURS).contains(&expiration_hours) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_HOURS",
                value: expiration_hours.to_string(),
            });
        }
        let jwt = JwtConfig {
            secret,
            expiration_hours,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "blog-api".to_string()),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080u16)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 5u64)?,
            keep_alive: Duration::from_secs(parse_or(&lookup, "KEEP_ALIVE_SECS", 10u64)?),
            client_request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "CLIENT_REQUEST_TIMEOUT_SECS",
                5u64,
            )?),
            database,
            redis,
            jwt,
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

fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_string(),
        }),
    }
}
