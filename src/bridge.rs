//! Bridge client.
//!
//! [`Bridge`] is the seam between the reconcile loop and the lighting
//! controller. [`HueBridge`] implements it against the Hue bridge's local REST
//! API; tests substitute their own implementations.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use log::debug;
use serde_json::Value;
use url::Url;

use crate::errors::Error;
use crate::payload::PartialState;
use crate::response::{
    ApplyResponse, DEVICE_OFF, RESOURCE_NOT_AVAILABLE, ReplyItem, first_error,
};
use crate::status::{self, BridgeLight};
use crate::types::{LightId, LightSnapshot};

type Result<T> = std::result::Result<T, Error>;

/// Read and write access to the lights behind a bridge.
pub trait Bridge: Send + Sync + 'static {
    /// List every light's current state.
    ///
    /// Any failure here is global: it fails with [`Error::Communication`].
    fn fetch_all(&self) -> impl Future<Output = Result<HashMap<LightId, LightSnapshot>>> + Send;

    /// Push a partial state to one light.
    ///
    /// Fails with [`Error::DeviceUnavailable`] when that light cannot be
    /// reached and [`Error::WriteFailed`] otherwise; neither concerns other
    /// lights.
    fn apply_state(
        &self,
        id: &LightId,
        state: &PartialState,
    ) -> impl Future<Output = Result<ApplyResponse>> + Send;
}

/// HTTP client for a Hue bridge.
///
/// The application username is part of every request path
/// (`/api/<username>/...`).
#[derive(Debug, Clone)]
pub struct HueBridge {
    base: Url,
    username: String,
    http: reqwest::Client,
}

impl HueBridge {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a client for the bridge at `host` (an address or a full URL).
    pub fn new(host: &str, username: &str) -> Result<Self> {
        Self::with_timeout(host, username, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(host: &str, username: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::communication("build client", e))?;

        Ok(HueBridge {
            base: base_url(host)?,
            username: username.to_string(),
            http,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", self.username.as_str()])
            .extend(segments);
        Ok(url)
    }
}

impl Bridge for HueBridge {
    async fn fetch_all(&self) -> Result<HashMap<LightId, LightSnapshot>> {
        const ACTION: &str = "list lights";

        let url = self.endpoint(&["lights"])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::communication(ACTION, e))?;

        let code = response.status();
        if !code.is_success() {
            return Err(Error::communication(ACTION, format!("HTTP {code}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::communication(ACTION, e))?;

        // Failures such as an unknown username come back as a 200 with an error array.
        if body.is_array() {
            let items: Vec<ReplyItem> =
                serde_json::from_value(body).map_err(|e| Error::communication(ACTION, e))?;
            let reason = first_error(&items)
                .map(|e| Error::from(e.clone()).to_string())
                .unwrap_or_else(|| "unexpected reply".to_string());
            return Err(Error::communication(ACTION, reason));
        }

        let listing: HashMap<String, BridgeLight> =
            serde_json::from_value(body).map_err(|e| Error::communication(ACTION, e))?;
        debug!("bridge reported {} lights", listing.len());
        Ok(status::snapshots(listing))
    }

    async fn apply_state(&self, id: &LightId, state: &PartialState) -> Result<ApplyResponse> {
        if !state.is_valid() {
            return Err(Error::write_failed(id, "no attributes set"));
        }

        let url = self.endpoint(&["lights", id.as_str(), "state"])?;
        let response = self
            .http
            .put(url)
            .json(state)
            .send()
            .await
            .map_err(|e| Error::device_unavailable(id, e))?;

        let code = response.status();
        if !code.is_success() {
            return Err(Error::write_failed(id, format!("HTTP {code}")));
        }

        let items: Vec<ReplyItem> = response
            .json()
            .await
            .map_err(|e| Error::write_failed(id, e))?;
        debug!("light {id} state reply: {items:?}");

        match first_error(&items) {
            Some(e) if e.kind == RESOURCE_NOT_AVAILABLE || e.kind == DEVICE_OFF => {
                Err(Error::device_unavailable(id, &e.description))
            }
            Some(e) => Err(Error::write_failed(id, Error::from(e.clone()))),
            None => Ok(ApplyResponse::new(id.clone(), state.clone())),
        }
    }
}

/// Turn a bridge address into the URL requests are built from.
///
/// A bare host or IP gets `http://`; anything with a scheme is parsed as is.
pub(crate) fn base_url(host: &str) -> Result<Url> {
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}/")
    };
    Url::parse(&raw).map_err(|e| Error::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })
}
