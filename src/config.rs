//! read client configuration from a file, the environment, or explicit values

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9090/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub enum ConfigLocation {
    File(String),
    Env,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Directory holding the origin-scoped credential file. In-memory storage when absent.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_dir: None,
            user_agent: None,
        }
    }
}

impl Config {
    pub fn load(loc: ConfigLocation) -> Result<Self, Error> {
        match loc {
            ConfigLocation::File(path) => Self::from_file(path),
            ConfigLocation::Env => Self::from_env(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validated()
    }

    /// # ENV Vars
    /// * `ROUTE_API_URL` - base URL of the API, e.g. `http://localhost:9090/api`
    /// * `ROUTE_API_TIMEOUT_MS` - per-request timeout in milliseconds
    /// * `ROUTE_API_STORAGE_DIR` - directory for persisted credentials
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("ROUTE_API_URL").unwrap_or_else(|_| default_base_url());
        let timeout_ms = match std::env::var("ROUTE_API_TIMEOUT_MS") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("ROUTE_API_TIMEOUT_MS must be an integer, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };
        let storage_dir = std::env::var("ROUTE_API_STORAGE_DIR").ok().map(PathBuf::from);
        Self {
            base_url,
            timeout_ms,
            storage_dir,
            user_agent: None,
        }
        .validated()
    }

    pub fn from_values(
        base_url: impl Into<String>,
        timeout_ms: Option<u64>,
        storage_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            storage_dir,
            user_agent: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn base_url(&self) -> Result<reqwest::Url, Error> {
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))
    }

    fn validated(self) -> Result<Self, Error> {
        self.base_url()?;
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be > 0".into()));
        }
        Ok(self)
    }
}
