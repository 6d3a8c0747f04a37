//! Bridge-assigned light identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque light identifier, stable across polling cycles.
///
/// The bridge keys its light listing by this value (e.g. `"1"`, `"12"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightId(String);

impl LightId {
    pub fn new(id: impl Into<String>) -> Self {
        LightId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LightId {
    fn from(id: &str) -> Self {
        LightId(id.to_string())
    }
}

impl From<String> for LightId {
    fn from(id: String) -> Self {
        LightId(id)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
