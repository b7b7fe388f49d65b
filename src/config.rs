use std::env;

use thiserror::Error;

pub const DEFAULT_GHTK_ENDPOINT: &str =
    "https://services.giaohangtietkiem.vn/services/shipment/order";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarrierConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GHTK_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub carrier: CarrierConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// The carrier API token is not part of it: it is stored with the other
    /// settings in the database and read at submission time.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let carrier = CarrierConfig {
            endpoint: lookup("GHTK_API_URL").unwrap_or_else(|| DEFAULT_GHTK_ENDPOINT.to_string()),
            timeout_secs: parse_or(&lookup, "GHTK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        };
        Ok(Self {
            database_url,
            host,
            port,
            carrier,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
