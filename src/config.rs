//! Persisted bridge address and application username.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Where the bridge lives and how to authenticate against it.
///
/// Written once after discovery and registration; read at every start.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bridge address (IP, host name or URL).
    #[serde(default)]
    pub bridge_ip: Option<String>,
    /// Application username issued by the bridge on registration.
    #[serde(default)]
    pub username: Option<String>,
}

impl BridgeConfig {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hue-power-memory"))
    }

    /// Full path to the config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("bridge.json"))
    }

    /// Whether both address and username are known.
    pub fn is_complete(&self) -> bool {
        self.bridge_ip.is_some() && self.username.is_some()
    }

    /// Load config from `path`, returning defaults if it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let (config, warnings) = Self::load_with_warnings(path);
        for w in &warnings {
            warn!("{w}");
        }
        config
    }

    /// Load config from `path`, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_with_warnings(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Save config to `path` atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| Error::config(path, e))?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(Error::JsonDump)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &contents).map_err(|e| Error::config(path, e))?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents).map_err(|e| Error::config(path, e));
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }
}
