//! Process configuration read from environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use shopcart_observability::LogFormat;

pub const DEFAULT_BIND: &str = "0.0.0.0:4000";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is required when {because}")]
    Missing { key: &'static str, because: &'static str },

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Where the catalog, cart and accounts live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Persistence {
    #[default]
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub log_format: LogFormat,
    /// Guard product creation and every `/api/cart` route with a bearer token.
    pub require_auth: bool,
    pub persistence: Persistence,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 4000)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            log_format: LogFormat::Json,
            require_auth: false,
            persistence: Persistence::InMemory,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind = match lookup("SHOPCART_BIND") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("SHOPCART_BIND", &raw, format!("{e}")))?,
            None => defaults.bind,
        };

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        let token_ttl = match lookup("TOKEN_TTL_MINUTES") {
            Some(raw) => {
                let minutes: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::invalid("TOKEN_TTL_MINUTES", &raw, format!("{e}")))?;
                if minutes <= 0 {
                    return Err(ConfigError::invalid(
                        "TOKEN_TTL_MINUTES",
                        &raw,
                        "must be a positive number of minutes",
                    ));
                }
                Duration::try_minutes(minutes).ok_or_else(|| {
                    ConfigError::invalid("TOKEN_TTL_MINUTES", &raw, "too large")
                })?
            }
            None => defaults.token_ttl,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::invalid("LOG_FORMAT", &raw, format!("{e}")))?,
            None => defaults.log_format,
        };

        let require_auth = parse_bool(&lookup, "REQUIRE_AUTH")?.unwrap_or(defaults.require_auth);

        let persistence = if parse_bool(&lookup, "USE_PERSISTENT_STORES")?.unwrap_or(false) {
            let database_url = lookup("DATABASE_URL")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing {
                    key: "DATABASE_URL",
                    because: "USE_PERSISTENT_STORES=true",
                })?;
            Persistence::Postgres { database_url }
        } else {
            Persistence::InMemory
        };

        Ok(Self {
            bind,
            jwt_secret,
            token_ttl,
            log_format,
            require_auth,
            persistence,
        })
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::invalid(key, &raw, "expected true or false")),
    }
}
