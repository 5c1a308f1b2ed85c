//! Environment-driven server configuration.

use spycat_core::default_log_level;
use std::env;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "spycat.sqlite3";
pub const DEFAULT_BREEDS_URL: &str = "https://api.thecatapi.com/v1/breeds";
pub const DEFAULT_BREED_CACHE_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute; relative values are resolved against the working directory.
    pub log_dir: PathBuf,
    pub breeds_url: String,
    pub breed_cache_ttl: Duration,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    WorkingDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid {
                var,
                value,
                expected,
            } => write!(f, "invalid {var}=`{value}`: expected {expected}"),
            Self::WorkingDir(message) => {
                write!(f, "cannot resolve working directory: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|err| ConfigError::WorkingDir(err.to_string()))?;
        Self::from_lookup(|name| env::var(name).ok(), cwd)
    }

    /// Builds a config from `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F, cwd: PathBuf) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => parse_port(&value)?,
            None => DEFAULT_PORT,
        };
        let ttl_secs = match get("SPYCAT_BREED_CACHE_TTL_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "SPYCAT_BREED_CACHE_TTL_SECS",
                value,
                expected: "a whole number of seconds",
            })?,
            None => DEFAULT_BREED_CACHE_TTL_SECS,
        };
        let seed_demo_data = match get("SPYCAT_SEED_DEMO_DATA") {
            Some(value) => parse_flag("SPYCAT_SEED_DEMO_DATA", value)?,
            None => false,
        };
        let log_dir = get("SPYCAT_LOG_DIR")
            .map(|value| cwd.join(value.trim()))
            .unwrap_or_else(|| cwd.join("logs"));

        Ok(Self {
            port,
            db_path: get("SPYCAT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_level: get("SPYCAT_LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            breeds_url: get("SPYCAT_BREEDS_URL").unwrap_or_else(|| DEFAULT_BREEDS_URL.to_string()),
            breed_cache_ttl: Duration::from_secs(ttl_secs),
            seed_demo_data,
        })
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Invalid {
            var: "PORT",
            value: value.to_string(),
            expected: "a port number in 1..=65535",
        }),
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            expected: "true|false",
        }),
    }
}
