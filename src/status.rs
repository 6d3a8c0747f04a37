//! Wire model of the bridge's light listing.
//!
//! The bridge reports light state under short keys (`bri`, `sat`, `ct`) nested
//! in a `state` object; this module maps it onto [`LightSnapshot`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{LightId, LightSnapshot, Xy};

/// One entry of `GET /api/<username>/lights`.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct BridgeLight {
    #[serde(default)]
    pub name: Option<String>,
    pub state: BridgeLightState,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct BridgeLightState {
    #[serde(default)]
    pub on: bool,
    #[serde(default = "default_reachable")]
    pub reachable: bool,
    pub bri: Option<u8>,
    pub hue: Option<u16>,
    pub sat: Option<u8>,
    pub xy: Option<Xy>,
    pub ct: Option<u16>,
}

fn default_reachable() -> bool {
    true
}

impl From<&BridgeLight> for LightSnapshot {
    fn from(light: &BridgeLight) -> Self {
        let state = &light.state;
        LightSnapshot {
            name: light.name.clone(),
            on: state.on,
            reachable: state.reachable,
            brightness: state.bri,
            hue: state.hue,
            saturation: state.sat,
            xy: state.xy,
            color_temperature: state.ct,
        }
    }
}

/// Convert a decoded listing into snapshots keyed by light id.
pub(crate) fn snapshots(listing: HashMap<String, BridgeLight>) -> HashMap<LightId, LightSnapshot> {
    listing
        .into_iter()
        .map(|(id, light)| (LightId::from(id), LightSnapshot::from(&light)))
        .collect()
}
