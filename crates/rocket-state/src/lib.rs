//! Event-to-state aggregation for rocket telemetry.
//!
//! Telemetry arrives out of order and possibly duplicated. This crate keeps
//! exactly one aggregated [`RocketState`](rocket_types::RocketState) per
//! rocket and updates it one event at a time.
//!
//! # Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | [`RocketStore`] | Concurrency-safe map from rocket ID to state |
//! | [`RocketService::process`] | Sequence check and per-kind transition |
//! | [`RocketService::list_all`] | Snapshot listing with optional ordering |
//!
//! # Transitions
//!
//! | Message | Effect |
//! |---------|--------|
//! | `RocketLaunched` | type, speed, mission set; status `LAUNCHED` |
//! | `RocketSpeedIncreased` | speed += by |
//! | `RocketSpeedDecreased` | speed -= by |
//! | `RocketMissionChanged` | mission replaced |
//! | `RocketExploded` | speed 0; status `EXPLODED`; reason set |
//!
//! Every applied event also records its sequence number and declared time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocket_state::{InMemoryRocketStore, RocketService};
//!
//! let service = RocketService::new(Arc::new(InMemoryRocketStore::new()));
//! service.process(&event);
//! let rockets = service.list_all("speed", "desc");
//! ```

mod error;
mod listing;
mod service;
mod store;

pub use error::RocketError;
pub use listing::{sort_states, SortField, SortOrder};
pub use service::{apply_event, ProcessOutcome, RocketService};
pub use store::{InMemoryRocketStore, RocketStore};

#[cfg(test)]
mod tests;
