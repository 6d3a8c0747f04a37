//! Observed light state.

use serde::{Deserialize, Serialize};

use crate::payload::PartialState;

use super::Xy;

/// The full observable power and color state of one light at one instant.
///
/// Color fields are optional: white-only bulbs and smart plugs do not report
/// them, and such lights can never match the factory reset signature.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightSnapshot {
    /// User-visible name reported by the bridge, used for log lines.
    pub name: Option<String>,
    pub on: bool,
    pub reachable: bool,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub xy: Option<Xy>,
    /// Color temperature in mireds.
    pub color_temperature: Option<u16>,
}

impl LightSnapshot {
    /// Name to show in log lines, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Returns this snapshot with the fields set in `partial` overwritten.
    ///
    /// `on`, `reachable` and `name` always come from `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_power_memory::{LightSnapshot, PartialState};
    ///
    /// let observed = LightSnapshot { on: true, brightness: Some(254), hue: Some(8418), ..Default::default() };
    /// let mut partial = PartialState::new();
    /// partial.brightness(100);
    ///
    /// let merged = observed.with_partial(&partial);
    /// assert_eq!(merged.brightness, Some(100));
    /// assert_eq!(merged.hue, Some(8418));
    /// assert!(merged.on);
    /// ```
    pub fn with_partial(&self, partial: &PartialState) -> Self {
        let mut merged = self.clone();
        if let Some(bri) = partial.bri {
            merged.brightness = Some(bri);
        }
        if let Some(hue) = partial.hue {
            merged.hue = Some(hue);
        }
        if let Some(sat) = partial.sat {
            merged.saturation = Some(sat);
        }
        if let Some(xy) = partial.xy {
            merged.xy = Some(xy);
        }
        if let Some(ct) = partial.ct {
            merged.color_temperature = Some(ct);
        }
        merged
    }
}
