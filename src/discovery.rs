//! Bridge discovery via the vendor's discovery endpoint.

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::bridge::HueBridge;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Discovery endpoint listing the bridges registered from this network.
pub const DISCOVERY_URL: &str = "https://discovery.meethue.com/";

/// A bridge found on the local network.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiscoveredBridge {
    /// Bridge identifier
    #[serde(default)]
    pub id: String,
    /// Address of the bridge on the local network
    #[serde(rename = "internalipaddress")]
    pub ip: String,
}

impl DiscoveredBridge {
    /// Convert this discovered bridge into a [`HueBridge`] client.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let bridges = discover_bridges(Duration::from_secs(5)).await?;
    /// let client = bridges[0].clone().into_client("username")?;
    /// ```
    pub fn into_client(self, username: &str) -> Result<HueBridge> {
        HueBridge::new(&self.ip, username)
    }
}

/// Discover Hue bridges on the local network.
///
/// Fails with [`Error::NoBridgeFound`] if the endpoint knows of none.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use hue_power_memory::discover_bridges;
///
/// let bridges = discover_bridges(Duration::from_secs(5)).await?;
/// println!("Using bridge found at {}", bridges[0].ip);
/// ```
pub async fn discover_bridges(timeout: Duration) -> Result<Vec<DiscoveredBridge>> {
    discover_bridges_at(DISCOVERY_URL, timeout).await
}

/// Discover bridges using the given discovery endpoint.
pub async fn discover_bridges_at(endpoint: &str, timeout: Duration) -> Result<Vec<DiscoveredBridge>> {
    const ACTION: &str = "discovery";

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::communication(ACTION, e))?;

    let response = http
        .get(endpoint)
        .send()
        .await
        .map_err(|e| Error::communication(ACTION, e))?;

    let code = response.status();
    if !code.is_success() {
        return Err(Error::communication(ACTION, format!("HTTP {code}")));
    }

    let bridges: Vec<DiscoveredBridge> = response
        .json()
        .await
        .map_err(|e| Error::communication(ACTION, e))?;
    debug!("discovery returned {bridges:?}");

    if bridges.is_empty() {
        return Err(Error::NoBridgeFound);
    }
    Ok(bridges)
}
