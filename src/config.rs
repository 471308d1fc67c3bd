//! Coordinator configuration.
//!
//! Defaults cover everything; a TOML file can override individual fields:
//!
//! ```toml
//! max_jobs_per_group = 16
//! features = ["probe", "submit"]
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use testbed_protocol::ops::names;
use testbed_protocol::{PROTOCOL_MAX, PROTOCOL_MIN};

/// Coordinator configuration settings.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Minimum supported protocol version.
    pub protocol_min: i32,
    /// Maximum supported protocol version.
    pub protocol_max: i32,
    /// Maximum assignments accepted in one submission.
    pub max_jobs_per_group: usize,
    /// Operation names advertised by probe.
    pub features: Vec<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            protocol_min: PROTOCOL_MIN,
            protocol_max: PROTOCOL_MAX,
            max_jobs_per_group: 32,
            features: [
                names::PROBE,
                names::GATEWAY_CREATE,
                names::GATEWAY_REGISTER,
                names::GATEWAY_HEARTBEAT,
                names::DEVICE_REGISTER,
                names::DEVICE_GET,
                names::DEVICE_LIST,
                names::DEVICE_REMOVE,
                names::FILE_REGISTER,
                names::FILE_LIST,
                names::FILE_REMOVE,
                names::SUBMIT,
                names::ADVANCE,
                names::CANCEL,
                names::GROUP_GET,
                names::GROUP_LIST,
                names::GROUP_STATUS,
                names::QUEUE,
                names::JOB_GET,
                names::JOB_LIST,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Errors for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// File-level overrides; absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    max_jobs_per_group: Option<usize>,
    features: Option<Vec<String>>,
}

impl CoordinatorConfig {
    /// Load configuration from a TOML file, merged over defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)?;

        let mut config = Self::default();
        if let Some(max) = file.max_jobs_per_group {
            config.max_jobs_per_group = max;
        }
        if let Some(features) = file.features {
            config.features = features;
        }
        Ok(config)
    }
}
