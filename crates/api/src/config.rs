//! Runtime configuration, read once from the environment at startup.

use core::str::FromStr;
use std::net::SocketAddr;

use thiserror::Error;

use pantry_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://pantry.db?mode=rwc";
pub const DEFAULT_RECIPES_URL: &str = "http://localhost:3000/api/getRecipeRecommendations";

/// Which storage collaborator backs the tracker.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!("expected \"memory\" or \"sqlite\", got {other:?}")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub sqlite_url: String,
    pub recipes_url: String,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().unwrap_or(SocketAddr::from(([0, 0, 0, 0], 8080))),
            store: StoreBackend::default(),
            sqlite_url: DEFAULT_SQLITE_URL.to_string(),
            recipes_url: DEFAULT_RECIPES_URL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Read `PANTRY_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (unset keys fall back to defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_or(&lookup, "PANTRY_BIND_ADDR", defaults.bind_addr)?,
            store: parse_or(&lookup, "PANTRY_STORE", defaults.store)?,
            sqlite_url: text_or(&lookup, "PANTRY_SQLITE_URL", defaults.sqlite_url),
            recipes_url: text_or(&lookup, "PANTRY_RECIPES_URL", defaults.recipes_url),
            log_format: parse_or(&lookup, "PANTRY_LOG_FORMAT", defaults.log_format)?,
        })
    }
}

fn text_or(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: String) -> String {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            tracing::info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + core::fmt::Debug,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                message: e.to_string(),
            })
        }
        _ => {
            tracing::info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
