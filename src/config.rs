//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::HeartscoreError;

pub const BIND_ADDR_ENV: &str = "HEARTSCORE_BIND_ADDR";
pub const SIMULATED_LATENCY_ENV: &str = "HEARTSCORE_SIMULATED_LATENCY_MS";
pub const LOG_MODE_ENV: &str = "HEARTSCORE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "HEARTSCORE_LOG_FILE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SIMULATED_LATENCY_MS: u64 = 1500;
const DEFAULT_LOG_FILE: &str = "heartscore.log";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    Stdout,
    File(PathBuf),
}

/// Runtime configuration of the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,

    /// Artificial delay applied to each prediction response
    pub simulated_latency: Duration,

    /// Log sink
    pub log_mode: LogMode,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns `HeartscoreError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, HeartscoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    /// Returns `HeartscoreError::Config` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HeartscoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| HeartscoreError::Config(format!("{BIND_ADDR_ENV}: {e}")))?;

        let latency_ms = match lookup(SIMULATED_LATENCY_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                HeartscoreError::Config(format!("{SIMULATED_LATENCY_ENV}={raw:?}: {e}"))
            })?,
            None => DEFAULT_SIMULATED_LATENCY_MS,
        };

        let log_mode = match lookup(LOG_MODE_ENV).as_deref() {
            None | Some("stdout") => LogMode::Stdout,
            Some("file") => LogMode::File(PathBuf::from(
                lookup(LOG_FILE_ENV).unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            )),
            Some(other) => {
                return Err(HeartscoreError::Config(format!(
                    "{LOG_MODE_ENV}={other:?}: expected \"stdout\" or \"file\""
                )))
            }
        };

        Ok(Self {
            bind_addr,
            simulated_latency: Duration::from_millis(latency_ms),
            log_mode,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            simulated_latency: Duration::from_millis(DEFAULT_SIMULATED_LATENCY_MS),
            log_mode: LogMode::Stdout,
        }
    }
}
