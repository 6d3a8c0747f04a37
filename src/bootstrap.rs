//! Startup: find the bridge, pair with it and remember both.

use std::path::Path;
use std::time::Duration;

use log::info;

use crate::auth::{self, DEFAULT_LINK_WAIT};
use crate::config::BridgeConfig;
use crate::discovery::{self, DISCOVERY_URL};
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Knobs for the one-time setup steps.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Endpoint queried when no bridge address is known.
    pub discovery_url: String,
    pub discovery_timeout: Duration,
    /// How long to wait for the link button during registration.
    pub link_wait: Duration,
    /// Name this application registers under (`app#device`).
    pub device_type: String,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions {
            discovery_url: DISCOVERY_URL.to_string(),
            discovery_timeout: Duration::from_secs(10),
            link_wait: DEFAULT_LINK_WAIT,
            device_type: format!("{}#{}", env!("CARGO_PKG_NAME"), std::env::consts::OS),
        }
    }
}

/// Fill in whatever `config` is missing and persist it to `path` if it changed.
///
/// Returns a config with both `bridge_ip` and `username` set.
pub async fn bootstrap(
    config: BridgeConfig,
    path: &Path,
    options: &BootstrapOptions,
) -> Result<BridgeConfig> {
    let mut resolved = config.clone();

    let host = match resolved.bridge_ip.clone() {
        Some(host) => host,
        None => {
            let bridges =
                discovery::discover_bridges_at(&options.discovery_url, options.discovery_timeout)
                    .await?;
            let first = bridges.into_iter().next().ok_or(Error::NoBridgeFound)?;
            info!("Using bridge found at {}", first.ip);
            resolved.bridge_ip = Some(first.ip.clone());
            first.ip
        }
    };

    if resolved.username.is_none() {
        let username = auth::register_user(&host, &options.device_type, options.link_wait).await?;
        info!("Registered with bridge at {host}");
        resolved.username = Some(username);
    }

    if resolved != config {
        resolved.save_to(path)?;
        info!("Saved bridge config to {}", path.display());
    }
    Ok(resolved)
}
