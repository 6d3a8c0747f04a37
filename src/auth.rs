//! Application user registration (link button pairing).

use std::time::Duration;

use log::{debug, info};
use serde_json::json;

use crate::bridge::base_url;
use crate::errors::Error;
use crate::response::{LINK_BUTTON_NOT_PRESSED, ReplyItem};
use crate::runtime::{self, Instant};

type Result<T> = std::result::Result<T, Error>;

/// How long to wait for the link button by default.
pub const DEFAULT_LINK_WAIT: Duration = Duration::from_secs(30);

const LINK_POLL_INTERVAL: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Register a new application user on the bridge at `host`.
///
/// The bridge only accepts registrations for a short while after its link
/// button is pressed, so this retries once per second until `wait` elapses.
/// Returns the issued username.
pub async fn register_user(host: &str, device_type: &str, wait: Duration) -> Result<String> {
    register_with_poll(host, device_type, wait, LINK_POLL_INTERVAL).await
}

pub(crate) async fn register_with_poll(
    host: &str,
    device_type: &str,
    wait: Duration,
    poll: Duration,
) -> Result<String> {
    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::communication("build client", e))?;
    let mut url = base_url(host)?;
    url.set_path("/api");

    info!("Please press the button on the bridge to authenticate");
    let start = Instant::now();
    loop {
        match create_user(&http, url.as_str(), device_type).await {
            Err(Error::LinkButtonNotPressed) if start.elapsed() < wait => {
                debug!("link button not pressed yet");
                runtime::sleep(poll).await;
            }
            Err(Error::LinkButtonNotPressed) => {
                return Err(Error::RegistrationTimedOut(wait.as_secs()));
            }
            other => return other,
        }
    }
}

async fn create_user(http: &reqwest::Client, url: &str, device_type: &str) -> Result<String> {
    const ACTION: &str = "register user";

    let response = http
        .post(url)
        .json(&json!({ "devicetype": device_type }))
        .send()
        .await
        .map_err(|e| Error::communication(ACTION, e))?;

    let code = response.status();
    if !code.is_success() {
        return Err(Error::communication(ACTION, format!("HTTP {code}")));
    }

    let items: Vec<ReplyItem> = response
        .json()
        .await
        .map_err(|e| Error::communication(ACTION, e))?;

    for item in items {
        match item {
            ReplyItem::Success(value) => {
                if let Some(username) = value.get("username").and_then(|u| u.as_str()) {
                    return Ok(username.to_string());
                }
            }
            ReplyItem::Error(e) if e.kind == LINK_BUTTON_NOT_PRESSED => {
                return Err(Error::LinkButtonNotPressed);
            }
            ReplyItem::Error(e) => return Err(e.into()),
        }
    }
    Err(Error::communication(ACTION, "reply carried no username"))
}
