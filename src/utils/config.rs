use crate::auth::jwt::DEFAULT_JWT_EXPIRATION_SECS;
use std::{env, fmt, str::FromStr};

/// Placeholder secret used when `JWT_SECRET` is unset. Never deploy with it.
pub const DEFAULT_JWT_SECRET: &str = "super-secret";

/// Longest accepted token lifetime: ten years.
pub const MAX_JWT_EXPIRATION_SECS: i64 = 10 * 365 * 24 * 3600;

/// Process-wide settings, read once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub public_host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    /// `host:port` of the database server
    pub address: String,
    pub name: String,
    /// Local libsql database path, or `:memory:`
    pub url: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_secs: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());

        let jwt_secret = get("JWT_SECRET", DEFAULT_JWT_SECRET);
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET",
                value: jwt_secret,
            });
        }

        let jwt_expiration_secs: i64 = parse_or(
            &lookup,
            "JWT_EXPIRATION_IN_SECONDS",
            DEFAULT_JWT_EXPIRATION_SECS,
        )?;
        if !(1..=MAX_JWT_EXPIRATION_SECS).contains(&jwt_expiration_secs) {
            return Err(ConfigError::InvalidValue {
                key: "JWT_EXPIRATION_IN_SECONDS",
                value: jwt_expiration_secs.to_string(),
            });
        }

        Ok(Config {
            public_host: get("PUBLIC_HOST", "http://localhost"),
            port: parse_or(&lookup, "PORT", 8080)?,
            database: DatabaseConfig {
                user: get("DB_USER", "root"),
                password: get("DB_PASSWORD", ""),
                address: format!(
                    "{}:{}",
                    get("DB_HOST", "127.0.0.1"),
                    get("DB_PORT", "3306")
                ),
                name: get("DB_NAME", "storefront"),
                url: get("DATABASE_URL", "./data/storefront.db"),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiration_secs,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, fallback: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(fallback),
    }
}
