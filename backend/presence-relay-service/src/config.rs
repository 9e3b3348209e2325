use crate::error::AppError;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// HS256 bearer token, identity taken from `sub`
    Jwt,
    /// Identity read straight from the `userId` query parameter.
    /// Only for local development behind a trusted gateway.
    Trusted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    pub heartbeat_interval: Duration,
    pub client_timeout: Duration,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(5),
            client_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: usize,
    pub auth_mode: AuthMode,
    pub jwt_secret: Option<String>,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub websocket: WebSocketConfig,
    pub log_format: LogFormat,
}

impl Config {
    fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    fn parse_number<T: std::str::FromStr>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
        default: T,
    ) -> Result<T, AppError> {
        match lookup(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{key} must be a number, got {raw:?}"))),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = Self::parse_number(&lookup, "PORT", 5001u16)?;
        let database_url = lookup("DATABASE_URL");
        let database_max_connections =
            Self::parse_number(&lookup, "DATABASE_MAX_CONNECTIONS", 10usize)?;

        let auth_mode = match lookup("AUTH_MODE").as_deref().map(str::to_ascii_lowercase) {
            None => AuthMode::Jwt,
            Some(mode) if mode == "jwt" => AuthMode::Jwt,
            Some(mode) if mode == "trusted" => AuthMode::Trusted,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "AUTH_MODE must be `jwt` or `trusted`, got {other:?}"
                )))
            }
        };

        let jwt_secret = lookup("JWT_SECRET");
        if auth_mode == AuthMode::Jwt && jwt_secret.is_none() {
            return Err(AppError::Config(
                "JWT_SECRET missing (required when AUTH_MODE=jwt)".into(),
            ));
        }

        let cors_raw =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into());
        let cors_allowed_origins = if cors_raw.trim() == "*" {
            Vec::new()
        } else {
            Self::parse_list(&cors_raw)
        };

        let heartbeat_secs = Self::parse_number(&lookup, "WS_HEARTBEAT_INTERVAL_SECS", 5u64)?;
        let timeout_secs = Self::parse_number(&lookup, "WS_CLIENT_TIMEOUT_SECS", 30u64)?;
        if heartbeat_secs == 0 || timeout_secs <= heartbeat_secs {
            return Err(AppError::Config(
                "WS_CLIENT_TIMEOUT_SECS must exceed a non-zero WS_HEARTBEAT_INTERVAL_SECS".into(),
            ));
        }

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            Some(f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            auth_mode,
            jwt_secret,
            cors_allowed_origins,
            websocket: WebSocketConfig {
                heartbeat_interval: Duration::from_secs(heartbeat_secs),
                client_timeout: Duration::from_secs(timeout_secs),
            },
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Trusted auth, in-memory storage, ephemeral port. Used by tests.
    pub fn test_defaults() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            database_max_connections: 1,
            auth_mode: AuthMode::Trusted,
            jwt_secret: None,
            cors_allowed_origins: Vec::new(),
            websocket: WebSocketConfig::default(),
            log_format: LogFormat::Text,
        }
    }
}
