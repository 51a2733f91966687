//! # Configuration
//!
//! LocalSync reads a TOML file with two sections:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8181
//!
//! [data]
//! file = "data.json"
//! plugins_dir = "plugins"
//! autosave_secs = 60
//! ```
//!
//! Every field is optional. CLI flags override file values.

use localsync_core::LocalSyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "localsync.toml";

/// Main LocalSync configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSyncConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,

    /// Persistence and plugin asset configuration
    pub data: DataConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8181,
        }
    }
}

/// Persistence and plugin asset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Snapshot file
    pub file: PathBuf,

    /// Directory served under `/plugins/`
    pub plugins_dir: PathBuf,

    /// Seconds between periodic snapshots (0 disables autosave)
    pub autosave_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data.json"),
            plugins_dir: PathBuf::from("plugins"),
            autosave_secs: 60,
        }
    }
}

/// Values supplied on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_file: Option<PathBuf>,
    pub plugins_dir: Option<PathBuf>,
    pub autosave_secs: Option<u64>,
}

impl LocalSyncConfig {
    /// Load configuration.
    ///
    /// An explicitly named file must exist. Without one, `localsync.toml` in
    /// the working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, LocalSyncError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, LocalSyncError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LocalSyncError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| LocalSyncError::Config(format!("'{}': {}", path.display(), e)))
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, LocalSyncError> {
        toml::from_str(content).map_err(|e| LocalSyncError::Config(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, LocalSyncError> {
        toml::to_string_pretty(self).map_err(|e| LocalSyncError::Config(e.to_string()))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(file) = overrides.data_file {
            self.data.file = file;
        }
        if let Some(dir) = overrides.plugins_dir {
            self.data.plugins_dir = dir;
        }
        if let Some(secs) = overrides.autosave_secs {
            self.data.autosave_secs = secs;
        }
        self
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Autosave period, or `None` when autosave is disabled.
    #[must_use]
    pub fn autosave_interval(&self) -> Option<Duration> {
        match self.data.autosave_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
