use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Network;

/// How often the synchronizer polls the chain when no interval is configured.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file")]
    Io(#[from] io::Error),
    #[error("malformed config")]
    Json(#[from] serde_json::Error),
    #[error("poll interval must be at least one second")]
    ZeroPollInterval,
}

/// Registry settings, usually read from a JSON file:
///
/// ```json
/// { "network": "mainnet", "poll_interval_secs": 15 }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub network: Network,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Config {
    pub fn new(network: Network) -> Self {
        Config {
            network,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_slice(data)?;
        if cfg.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_slice(&fs::read(path)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
