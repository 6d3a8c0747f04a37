//! CIE chromaticity coordinates.

use serde::{Deserialize, Serialize};

/// A CIE 1931 chromaticity pair.
///
/// Serialized as a two-element array, the way the bridge reports it.
///
/// # Examples
///
/// ```
/// use hue_power_memory::Xy;
///
/// let xy: Xy = serde_json::from_str("[0.4573, 0.41]").unwrap();
/// assert_eq!(xy, Xy::new(0.4573, 0.41));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xy(pub f64, pub f64);

impl Xy {
    pub fn new(x: f64, y: f64) -> Self {
        Xy(x, y)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }
}
