//! Connection configuration
//!
//! Every key is optional; unknown keys are rejected so typos surface early.
//!
//! ```yaml
//! shared_memory_name: "$Race$"
//! process_names: [RRRE.exe, RRRE64.exe]
//! poll_interval_ms: 100
//! wait_timeout_secs: 600
//! schema: auto            # or legacy-v1, legacy-v2, 1.7, ...
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::decoder::SchemaSelection;
use crate::{Result, TelemetryError};

/// Name of the segment RaceRoom publishes its telemetry in
pub const DEFAULT_SHARED_MEMORY_NAME: &str = "$Race$";

/// Executable names of the RaceRoom client
pub const DEFAULT_PROCESS_NAMES: [&str; 2] = ["RRRE.exe", "RRRE64.exe"];

/// Settings for a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub shared_memory_name: String,
    /// Producer executables, matched case-insensitively
    pub process_names: Vec<String>,
    pub poll_interval_ms: u64,
    /// Give up when no producer appears within this window
    pub wait_timeout_secs: u64,
    pub schema: SchemaSelection,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            shared_memory_name: DEFAULT_SHARED_MEMORY_NAME.to_string(),
            process_names: DEFAULT_PROCESS_NAMES.iter().map(|s| s.to_string()).collect(),
            poll_interval_ms: 100,
            wait_timeout_secs: 600,
            schema: SchemaSelection::Auto,
        }
    }
}

impl ConnectionConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config_error(e.to_string(), Some(Box::new(e))))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), ?config, "Loaded connection config");
        Ok(config)
    }

    /// Reject settings a live connection cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.shared_memory_name.is_empty() {
            return Err(TelemetryError::config_error("shared_memory_name must not be empty", None));
        }
        if self.poll_interval_ms == 0 {
            return Err(TelemetryError::config_error("poll_interval_ms must be positive", None));
        }
        Ok(())
    }

    /// Never shorter than 1ms, even for an unvalidated config.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_hz(&self) -> f64 {
        1000.0 / self.poll_interval_ms.max(1) as f64
    }
}
