use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::auth::{TokenConfig, DEFAULT_TTL_SECONDS};
use crate::password_reset::PasswordResetConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEV_JWT_SECRET: &str = "your-jwt-secret-key";
const MAX_JWT_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;
const MAX_RESET_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Deployment environment, selected with `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in the production environment")]
    MissingInProduction(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process-wide settings read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub reset_token_ttl_minutes: i64,
    pub expose_reset_token: bool,
    pub seed_sample_data: bool,
}

impl AppConfig {
    /// Reads configuration from the process environment, after loading a
    /// `.env` file from the working directory if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = match var("APP_ENV") {
            Some(value) => parse_value("APP_ENV", &value)?,
            None => Environment::Development,
        };
        let is_production = environment == Environment::Production;

        let database_url = var("DATABASE_URL");
        let jwt_secret = var("JWT_SECRET_KEY");
        if is_production {
            if database_url.is_none() {
                return Err(ConfigError::MissingInProduction("DATABASE_URL"));
            }
            if jwt_secret.is_none() {
                return Err(ConfigError::MissingInProduction("JWT_SECRET_KEY"));
            }
        }

        Ok(Self {
            environment,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url,
            jwt_secret: jwt_secret.unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            jwt_ttl_seconds: parse_ttl(
                "JWT_EXP_DELTA_SECONDS",
                var("JWT_EXP_DELTA_SECONDS"),
                DEFAULT_TTL_SECONDS,
                MAX_JWT_TTL_SECONDS,
            )?,
            reset_token_ttl_minutes: parse_ttl(
                "RESET_TOKEN_TTL_MINUTES",
                var("RESET_TOKEN_TTL_MINUTES"),
                60,
                MAX_RESET_TTL_MINUTES,
            )?,
            expose_reset_token: parse_or(
                "EXPOSE_RESET_TOKEN",
                var("EXPOSE_RESET_TOKEN"),
                !is_production,
            )?,
            seed_sample_data: parse_or(
                "SEED_SAMPLE_DATA",
                var("SEED_SAMPLE_DATA"),
                !is_production,
            )?,
        })
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone(), self.jwt_ttl_seconds)
    }

    pub fn reset_config(&self) -> PasswordResetConfig {
        PasswordResetConfig {
            token_ttl_minutes: self.reset_token_ttl_minutes,
            expose_token: self.expose_reset_token,
        }
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => parse_value(name, &value),
        None => Ok(default),
    }
}

/// Lifetimes must be positive and no longer than `max`, so expiry arithmetic
/// can never leave chrono's representable range.
fn parse_ttl(
    name: &'static str,
    value: Option<String>,
    default: i64,
    max: i64,
) -> Result<i64, ConfigError> {
    let ttl = parse_or(name, value.clone(), default)?;
    if (1..=max).contains(&ttl) {
        Ok(ttl)
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value: value.unwrap_or_else(|| ttl.to_string()),
        })
    }
}
