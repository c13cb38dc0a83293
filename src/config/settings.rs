//! Application settings loaded from environment variables.

use std::env;

use thiserror::Error;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TOKEN_EXPIRATION_HOURS, DEV_JWT_SECRET, MAX_TOKEN_EXPIRATION_HOURS,
    MIN_JWT_SECRET_LENGTH,
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable must be set in production")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LENGTH)]
    JwtSecretTooShort,

    #[error(
        "TOKEN_EXPIRATION_HOURS must be a whole number between 1 and {}",
        MAX_TOKEN_EXPIRATION_HOURS
    )]
    InvalidTokenExpiration,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    token_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_expiration_hours", &self.token_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the
    /// database URL and signing secret.
    pub fn new(
        database_url: impl Into<String>,
        jwt_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::JwtSecretTooShort);
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            token_expiration_hours: DEFAULT_TOKEN_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables (and `.env`).
    ///
    /// In release builds JWT_SECRET is mandatory.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => return Err(ConfigError::MissingJwtSecret),
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;
        if let Ok(raw) = env::var("TOKEN_EXPIRATION_HOURS") {
            let hours = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTokenExpiration)?;
            config = config.with_token_expiration_hours(hours)?;
        }
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        Ok(config)
    }

    /// Set the token lifetime, rejecting values outside
    /// `1..=MAX_TOKEN_EXPIRATION_HOURS`.
    pub fn with_token_expiration_hours(mut self, hours: i64) -> Result<Self, ConfigError> {
        if !(1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&hours) {
            return Err(ConfigError::InvalidTokenExpiration);
        }
        self.token_expiration_hours = hours;
        Ok(self)
    }

    pub fn token_expiration_hours(&self) -> i64 {
        self.token_expiration_hours
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("sqlite::memory:", "too-short");
        assert!(matches!(result, Err(ConfigError::JwtSecretTooShort)));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("sqlite::memory:", DEV_JWT_SECRET).unwrap();
        assert_eq!(config.token_expiration_hours(), DEFAULT_TOKEN_EXPIRATION_HOURS);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_token_expiration_bounds() {
        let config = || Config::new("sqlite::memory:", DEV_JWT_SECRET).unwrap();

        assert_eq!(
            config().with_token_expiration_hours(1).unwrap().token_expiration_hours(),
            1
        );
        assert!(config()
            .with_token_expiration_hours(MAX_TOKEN_EXPIRATION_HOURS)
            .is_ok());

        for hours in [0, -1, MAX_TOKEN_EXPIRATION_HOURS + 1, 9_000_000_000_000] {
            assert!(
                matches!(
                    config().with_token_expiration_hours(hours),
                    Err(ConfigError::InvalidTokenExpiration)
                ),
                "{hours} should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/accounts", DEV_JWT_SECRET).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("pw@db"));
        assert!(!rendered.contains(DEV_JWT_SECRET));
    }
}
