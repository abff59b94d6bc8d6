//! Process configuration read from the environment.

use std::path::PathBuf;

use crate::estimator::DEFAULT_BASE_URL;

/// Errors from reading configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Startup configuration for the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory of graph JSON files (`GRAPHS_DIR`).
    pub graphs_dir: Option<PathBuf>,
    /// GTFS feed directory (`GTFS_DIR`).
    pub gtfs_dir: Option<PathBuf>,
    /// OSRM base URL up to `route/v1` (`OSRM_BASE_URL`).
    pub osrm_base_url: String,
    /// Per-request timeout in seconds (`OSRM_TIMEOUT_SECS`).
    pub osrm_timeout_secs: u64,
    /// Via-points evaluated at once (`PLANNER_CONCURRENCY`).
    pub planner_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graphs_dir: None,
            gtfs_dir: None,
            osrm_base_url: DEFAULT_BASE_URL.to_string(),
            osrm_timeout_secs: 10,
            planner_concurrency: 5,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or empty variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            graphs_dir: get("GRAPHS_DIR").map(PathBuf::from),
            gtfs_dir: get("GTFS_DIR").map(PathBuf::from),
            osrm_base_url: get("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url),
            osrm_timeout_secs: parse_number(&get, "OSRM_TIMEOUT_SECS")?
                .unwrap_or(defaults.osrm_timeout_secs),
            planner_concurrency: parse_number(&get, "PLANNER_CONCURRENCY")?
                .filter(|&n| n > 0)
                .unwrap_or(defaults.planner_concurrency),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}
