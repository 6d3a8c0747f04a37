//! Value types describing a light and its observable state.

mod light_id;
mod snapshot;
mod xy;

pub use light_id::LightId;
pub use snapshot::LightSnapshot;
pub use xy::Xy;
