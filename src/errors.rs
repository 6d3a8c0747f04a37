use std::path::{Path, PathBuf};

use crate::types::LightId;

/// All error types that can occur while watching and restoring lights.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The bridge could not be queried at all.
    ///
    /// Raised by a light listing; aborts the current cycle only.
    #[error("bridge {action} failed: {reason}")]
    Communication { action: String, reason: String },

    /// A single light could not be reached while writing its state.
    #[error("light {light} is unavailable: {reason}")]
    DeviceUnavailable { light: LightId, reason: String },

    /// Writing a single light's state failed for a reason other than reachability.
    #[error("failed to write state of light {light}: {reason}")]
    WriteFailed { light: LightId, reason: String },

    /// The bridge answered with an error object.
    #[error("bridge error {kind} at {address}: {description}")]
    Bridge {
        kind: u16,
        address: String,
        description: String,
    },

    /// The bridge link button has not been pressed yet.
    #[error("link button not pressed")]
    LinkButtonNotPressed,

    /// Registration did not succeed before the wait elapsed.
    #[error("no link button press within {0}s")]
    RegistrationTimedOut(u64),

    /// Discovery returned no bridge on the local network.
    #[error("no bridge found on LAN")]
    NoBridgeFound,

    /// The bridge address could not be turned into a URL.
    #[error("invalid bridge url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The bridge configuration file could not be written.
    #[error("config {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl Error {
    /// Create a new communication error
    pub fn communication(action: &str, reason: impl ToString) -> Self {
        Error::Communication {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new device unavailable error
    pub fn device_unavailable(light: &LightId, reason: impl ToString) -> Self {
        Error::DeviceUnavailable {
            light: light.clone(),
            reason: reason.to_string(),
        }
    }

    /// Create a new write failure error
    pub fn write_failed(light: &LightId, reason: impl ToString) -> Self {
        Error::WriteFailed {
            light: light.clone(),
            reason: reason.to_string(),
        }
    }

    /// Create a new config error
    pub fn config(path: &Path, reason: impl ToString) -> Self {
        Error::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means a light could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::DeviceUnavailable { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
