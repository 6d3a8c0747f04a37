//! Factory reset detection.
//!
//! A Hue light that loses power comes back on with a fixed "warm white"
//! appearance. Seeing every one of these values at once is taken as proof the
//! light was power-cycled rather than set that way by a user.

use crate::types::{LightSnapshot, Xy};

/// Brightness a light reports after a power cycle.
pub const FACTORY_BRIGHTNESS: u8 = 254;
/// Hue a light reports after a power cycle.
pub const FACTORY_HUE: u16 = 8418;
/// Saturation a light reports after a power cycle.
pub const FACTORY_SATURATION: u8 = 140;
/// Chromaticity a light reports after a power cycle.
pub const FACTORY_XY: Xy = Xy(0.4573, 0.41);
/// Color temperature (mireds) a light reports after a power cycle.
pub const FACTORY_COLOR_TEMPERATURE: u16 = 366;

/// Returns `true` if the light shows the factory default appearance.
///
/// The xy pair is compared exactly; the bridge reports these values verbatim.
///
/// # Examples
///
/// ```
/// use hue_power_memory::{LightSnapshot, is_reset, reset};
///
/// let mut light = LightSnapshot {
///     on: true,
///     reachable: true,
///     brightness: Some(reset::FACTORY_BRIGHTNESS),
///     hue: Some(reset::FACTORY_HUE),
///     saturation: Some(reset::FACTORY_SATURATION),
///     xy: Some(reset::FACTORY_XY),
///     color_temperature: Some(reset::FACTORY_COLOR_TEMPERATURE),
///     name: None,
/// };
/// assert!(is_reset(&light));
///
/// light.on = false;
/// assert!(!is_reset(&light));
/// ```
pub fn is_reset(snapshot: &LightSnapshot) -> bool {
    snapshot.on
        && snapshot.brightness == Some(FACTORY_BRIGHTNESS)
        && snapshot.hue == Some(FACTORY_HUE)
        && snapshot.saturation == Some(FACTORY_SATURATION)
        && snapshot.xy == Some(FACTORY_XY)
        && snapshot.color_temperature == Some(FACTORY_COLOR_TEMPERATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> LightSnapshot {
        LightSnapshot {
            name: Some("Hall".into()),
            on: true,
            reachable: true,
            brightness: Some(FACTORY_BRIGHTNESS),
            hue: Some(FACTORY_HUE),
            saturation: Some(FACTORY_SATURATION),
            xy: Some(FACTORY_XY),
            color_temperature: Some(FACTORY_COLOR_TEMPERATURE),
        }
    }

    #[test]
    fn test_factory_signature_matches() {
        assert!(is_reset(&factory()));
    }

    #[test]
    fn test_reachability_and_name_do_not_matter() {
        let mut light = factory();
        light.reachable = false;
        light.name = None;
        assert!(is_reset(&light));
    }

    #[test]
    fn test_single_field_deviation() {
        let deviations: [fn(&mut LightSnapshot); 8] = [
            |l| l.on = false,
            |l| l.brightness = Some(FACTORY_BRIGHTNESS - 1),
            |l| l.hue = Some(FACTORY_HUE + 1),
            |l| l.saturation = Some(FACTORY_SATURATION + 1),
            |l| l.xy = Some(Xy(0.4573 + f64::EPSILON, 0.41)),
            |l| l.xy = Some(Xy(0.4573, 0.4101)),
            |l| l.color_temperature = Some(FACTORY_COLOR_TEMPERATURE - 1),
            |l| l.hue = None,
        ];

        for (i, deviate) in deviations.iter().enumerate() {
            let mut light = factory();
            deviate(&mut light);
            assert!(!is_reset(&light), "deviation #{i} still detected as reset");
        }
    }

    #[test]
    fn test_white_only_light_never_reset() {
        let light = LightSnapshot {
            on: true,
            reachable: true,
            brightness: Some(FACTORY_BRIGHTNESS),
            ..Default::default()
        };
        assert!(!is_reset(&light));
    }
}
