//! Process configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::planner::SearchConfig;

/// Schedule CSV path.
pub const DATA_VAR: &str = "FLIGHT_DATA";
/// Listen address.
pub const BIND_VAR: &str = "FLIGHT_BIND";
/// Overrides `SearchConfig::max_stops`.
pub const MAX_STOPS_VAR: &str = "FLIGHT_MAX_STOPS";
/// Overrides `SearchConfig::min_connection_mins`.
pub const MIN_CONNECTION_VAR: &str = "FLIGHT_MIN_CONNECTION_MINS";

const DEFAULT_DATA: &str = "./data/testing_data.csv";
const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// A variable was set to something unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub bind: SocketAddr,
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = PathBuf::from(lookup(DATA_VAR).unwrap_or_else(|| DEFAULT_DATA.into()));

        let bind = match lookup(BIND_VAR) {
            Some(value) => value.parse().map_err(|_| ConfigError {
                var: BIND_VAR,
                value,
                reason: "not a socket address",
            })?,
            None => DEFAULT_BIND,
        };

        let mut search = SearchConfig::default();
        if let Some(value) = lookup(MAX_STOPS_VAR) {
            search.max_stops = value.trim().parse().map_err(|_| ConfigError {
                var: MAX_STOPS_VAR,
                value,
                reason: "not a non-negative integer",
            })?;
        }
        if let Some(value) = lookup(MIN_CONNECTION_VAR) {
            search.min_connection_mins = match value.trim().parse::<i64>() {
                Ok(mins) if mins >= 0 => mins,
                _ => {
                    return Err(ConfigError {
                        var: MIN_CONNECTION_VAR,
                        value,
                        reason: "not a non-negative integer",
                    });
                }
            };
        }

        Ok(Self {
            data_path,
            bind,
            search,
        })
    }
}
