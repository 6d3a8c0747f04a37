//! Restore payload written to a light.

use serde::{Deserialize, Serialize};

use crate::types::{LightSnapshot, Xy};

/// A partial light state to write to the bridge.
///
/// Carries only the five color fields a restore pushes back; power and
/// reachability are never written. Unset fields are left out of the request
/// body, so the bridge keeps its current value for them.
///
/// # Creating payloads
///
/// 1. **From a prior snapshot**, which is what a restore does:
///    ```
///    use hue_power_memory::{LightSnapshot, PartialState};
///    let prior = LightSnapshot { brightness: Some(100), ..Default::default() };
///    let payload = PartialState::from(&prior);
///    assert_eq!(payload.get_brightness(), Some(100));
///    ```
///
/// 2. **Builder pattern** for individual fields:
///    ```
///    use hue_power_memory::PartialState;
///    let mut payload = PartialState::new();
///    payload.brightness(80);
///    payload.color_temperature(300);
///    assert!(payload.is_valid());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialState {
    pub(crate) bri: Option<u8>,
    pub(crate) hue: Option<u16>,
    pub(crate) sat: Option<u8>,
    pub(crate) xy: Option<Xy>,
    pub(crate) ct: Option<u16>,
}

impl PartialState {
    /// Create a new empty payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_power_memory::PartialState;
    ///
    /// let payload = PartialState::new();
    /// assert_eq!(payload.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this payload contains at least one field.
    pub fn is_valid(&self) -> bool {
        self.bri.is_some()
            || self.hue.is_some()
            || self.sat.is_some()
            || self.xy.is_some()
            || self.ct.is_some()
    }

    pub fn brightness(&mut self, bri: u8) {
        self.bri = Some(bri);
    }

    pub fn hue(&mut self, hue: u16) {
        self.hue = Some(hue);
    }

    pub fn saturation(&mut self, sat: u8) {
        self.sat = Some(sat);
    }

    pub fn xy(&mut self, xy: Xy) {
        self.xy = Some(xy);
    }

    /// Set the color temperature in mireds.
    pub fn color_temperature(&mut self, ct: u16) {
        self.ct = Some(ct);
    }

    pub fn get_brightness(&self) -> Option<u8> {
        self.bri
    }

    pub fn get_hue(&self) -> Option<u16> {
        self.hue
    }

    pub fn get_saturation(&self) -> Option<u8> {
        self.sat
    }

    pub fn get_xy(&self) -> Option<Xy> {
        self.xy
    }

    pub fn get_color_temperature(&self) -> Option<u16> {
        self.ct
    }
}

impl From<&LightSnapshot> for PartialState {
    fn from(snapshot: &LightSnapshot) -> Self {
        PartialState {
            bri: snapshot.brightness,
            hue: snapshot.hue,
            sat: snapshot.saturation,
            xy: snapshot.xy,
            ct: snapshot.color_temperature,
        }
    }
}
