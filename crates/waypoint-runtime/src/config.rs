//! Runtime configuration.
//!
//! Read once at startup from `waypoint.toml`; a missing file yields the
//! shipped defaults (120 s timeout, 10 s cooldown, no cross-world). The
//! engine receives plain values — no file formats cross the port boundary.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tpa_engine::TeleportConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level `waypoint.toml` schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuntimeConfig {
    pub teleport: TeleportSection,
    pub log: LogSection,
}

/// `[teleport]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TeleportSection {
    /// How long a request stays pending, in seconds.
    pub request_timeout_secs: u64,
    /// Minimum interval between sends per requester, in seconds.
    pub request_cooldown_secs: u64,
    /// Whether requests may cross world boundaries.
    pub allow_cross_world: bool,
}

impl Default for TeleportSection {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            request_cooldown_secs: 10,
            allow_cross_world: false,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LogSection {
    /// Default tracing filter, overridable via `RUST_LOG`.
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Loads the config from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Converts the `[teleport]` section into the engine's config values.
    pub fn engine_config(&self) -> TeleportConfig {
        TeleportConfig {
            request_timeout: Duration::from_secs(self.teleport.request_timeout_secs),
            request_cooldown: Duration::from_secs(self.teleport.request_cooldown_secs),
            allow_cross_world: self.teleport.allow_cross_world,
        }
    }
}
