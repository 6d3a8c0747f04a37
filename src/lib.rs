//! # hue_power_memory
//!
//! Keeps Philips Hue lights looking the way they did before a power cut.
//!
//! A Hue light that loses power (an outage, or someone flipping the wall
//! switch) comes back on in its factory "warm white". This crate polls the
//! bridge at a fixed interval, remembers each light's last known good color,
//! and writes it back as soon as a light shows the factory signature or drops
//! off the network.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_power_memory::{HueBridge, Reconciler, Scheduler};
//!
//! async fn watch() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = HueBridge::new("192.168.1.20", "my-app-username")?;
//!     Scheduler::new(Reconciler::new(bridge)).run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - [`Bridge`] / [`HueBridge`]: list lights, write a partial state to one light
//! - [`is_reset`]: factory default detection
//! - [`Store`]: last known good snapshot per light, in memory only
//! - [`Reconciler`]: one cycle of fetch, per-light restore and merge
//! - [`Scheduler`]: runs cycles at a fixed cadence, forever
//! - [`bootstrap`]: discovery, link button pairing and the config file
//!
//! ## Communication
//!
//! All traffic goes to the bridge's local v1 REST API over HTTP. Lights are
//! never contacted directly.

mod auth;
mod bootstrap;
mod bridge;
mod config;
mod discovery;
mod errors;
mod history;
mod payload;
mod reconciler;
pub mod reset;
mod response;
pub mod runtime;
mod scheduler;
mod status;
mod store;
mod types;

// Re-export public API
pub use auth::{DEFAULT_LINK_WAIT, register_user};
pub use bootstrap::{BootstrapOptions, bootstrap};
pub use bridge::{Bridge, HueBridge};
pub use config::BridgeConfig;
pub use discovery::{DISCOVERY_URL, DiscoveredBridge, discover_bridges, discover_bridges_at};
pub use errors::Error;
pub use history::{CycleHistory, EventType, HistoryEntry, HistorySummary};
pub use payload::PartialState;
pub use reconciler::{CycleReport, Decision, Reconciler, RestoreReason, decide};
pub use reset::is_reset;
pub use response::ApplyResponse;
pub use scheduler::{Scheduler, sleep_duration};
pub use store::{LightOutcome, Store};
pub use types::{LightId, LightSnapshot, Xy};
