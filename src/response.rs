//! Bridge replies.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::Error;
use crate::payload::PartialState;
use crate::types::LightId;

/// Bridge error type: resource (light) not available.
pub const RESOURCE_NOT_AVAILABLE: u16 = 3;
/// Bridge error type: link button not pressed.
pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;
/// Bridge error type: parameter not modifiable, the device is off.
pub const DEVICE_OFF: u16 = 201;

/// Result of a successful state write.
///
/// Echoes the payload the bridge accepted, so callers can fold it into the
/// snapshot they already hold without fetching again.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResponse {
    pub id: LightId,
    pub state: PartialState,
}

impl ApplyResponse {
    pub fn new(id: LightId, state: PartialState) -> Self {
        ApplyResponse { id, state }
    }
}

/// One element of the array the bridge answers writes and registrations with.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReplyItem {
    Success(Value),
    Error(BridgeError),
}

/// An error object reported by the bridge.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub(crate) struct BridgeError {
    #[serde(rename = "type")]
    pub kind: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl From<BridgeError> for Error {
    fn from(e: BridgeError) -> Self {
        Error::Bridge {
            kind: e.kind,
            address: e.address,
            description: e.description,
        }
    }
}

/// Returns the first error in a reply, if any.
pub(crate) fn first_error(items: &[ReplyItem]) -> Option<&BridgeError> {
    items.iter().find_map(|item| match item {
        ReplyItem::Error(e) => Some(e),
        ReplyItem::Success(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_reply() {
        let items: Vec<ReplyItem> = serde_json::from_value(json!([
            {"success": {"/lights/1/state/bri": 100}},
            {"error": {"type": 201, "address": "/lights/1/state/hue",
                       "description": "parameter, hue, is not modifiable. Device is set to off."}}
        ]))
        .unwrap();

        let err = first_error(&items).unwrap();
        assert_eq!(err.kind, DEVICE_OFF);
        assert_eq!(err.address, "/lights/1/state/hue");
    }

    #[test]
    fn test_success_only_reply() {
        let items: Vec<ReplyItem> =
            serde_json::from_value(json!([{"success": {"/lights/1/state/ct": 300}}])).unwrap();
        assert!(first_error(&items).is_none());
    }

    #[test]
    fn test_into_error() {
        let err = Error::from(BridgeError {
            kind: 1,
            address: "/lights".into(),
            description: "unauthorized user".into(),
        });
        assert_eq!(err.to_string(), "bridge error 1 at /lights: unauthorized user");
    }
}
