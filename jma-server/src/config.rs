//! Runtime configuration from the environment.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::jma::{JmaClient, JmaConfig, JmaError};
use crate::stations::{DatasetError, StationDirectory};

/// Default bind address for the HTTP transport.
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8000";

pub const ENV_STATION_TABLE: &str = "JMA_STATION_TABLE";
pub const ENV_FETCH_STATIONS: &str = "JMA_FETCH_STATIONS";
pub const ENV_BASE_URL: &str = "JMA_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "JMA_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENT: &str = "JMA_MAX_CONCURRENT";
pub const ENV_HTTP_BIND: &str = "JMA_HTTP_BIND";

/// A malformed environment variable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub message: String,
}

/// Why the JMA station table could not be used.
#[derive(Debug, thiserror::Error)]
enum RemoteTableError {
    #[error(transparent)]
    Fetch(#[from] JmaError),
    #[error(transparent)]
    Parse(#[from] DatasetError),
}

/// Everything the binary needs before it can serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Station table file, used instead of fetching from JMA
    pub station_table: Option<PathBuf>,

    /// Fetch the full station table from JMA when no file is configured
    pub fetch_station_table: bool,

    /// Remote client settings
    pub jma: JmaConfig,

    /// Default address for `serve --http`
    pub http_bind: String,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            station_table: None,
            fetch_station_table: true,
            jma: JmaConfig::default(),
            http_bind: DEFAULT_HTTP_BIND.to_string(),
        }
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or empty keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(path) = get(ENV_STATION_TABLE) {
            config = config.with_station_table(path);
        }
        if let Some(raw) = get(ENV_FETCH_STATIONS) {
            config.fetch_station_table = parse_flag(ENV_FETCH_STATIONS, &raw)?;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            config.jma = config.jma.with_base_url(url);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.jma = config.jma.with_timeout(parse_positive(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = get(ENV_MAX_CONCURRENT) {
            let n = parse_positive(ENV_MAX_CONCURRENT, &raw)?;
            config.jma = config.jma.with_max_concurrent(n as usize);
        }
        if let Some(bind) = get(ENV_HTTP_BIND) {
            config = config.with_http_bind(bind);
        }

        Ok(config)
    }

    pub fn with_station_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.station_table = Some(path.into());
        self
    }

    pub fn with_fetch_station_table(mut self, fetch: bool) -> Self {
        self.fetch_station_table = fetch;
        self
    }

    pub fn with_jma(mut self, jma: JmaConfig) -> Self {
        self.jma = jma;
        self
    }

    pub fn with_http_bind(mut self, addr: impl Into<String>) -> Self {
        self.http_bind = addr.into();
        self
    }

    /// Build the station directory.
    ///
    /// A configured file wins. Otherwise the full table is fetched from JMA
    /// through `client`; if that fails, or fetching is disabled, the bundled
    /// subset is used.
    pub async fn load_directory(
        &self,
        client: &JmaClient,
    ) -> Result<StationDirectory, DatasetError> {
        let (directory, source) = match &self.station_table {
            Some(path) => (StationDirectory::load(path)?, path.display().to_string()),
            None if self.fetch_station_table => match fetch_directory(client).await {
                Ok(directory) => (directory, "jma".to_string()),
                Err(e) => {
                    warn!(error = %e, "JMA station table unavailable, using bundled subset");
                    (StationDirectory::bundled()?, "bundled".to_string())
                }
            },
            None => (StationDirectory::bundled()?, "bundled".to_string()),
        };
        info!(stations = directory.len(), %source, "station directory loaded");
        Ok(directory)
    }
}

async fn fetch_directory(client: &JmaClient) -> Result<StationDirectory, RemoteTableError> {
    let table = client.fetch_station_table().await?;
    Ok(StationDirectory::from_value(table)?)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: raw.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let err = |message: &str| ConfigError {
        var,
        value: raw.to_string(),
        message: message.to_string(),
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(err("must be at least 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(err("expected a positive integer")),
    }
}
