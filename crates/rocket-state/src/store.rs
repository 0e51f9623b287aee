//! In-memory storage for aggregated rocket state.
//!
//! All access goes through the [`RocketStore`] trait: upsert one state, read
//! one state, or snapshot all of them. Every individual call is atomic with
//! respect to every other call; nothing spans more than one call.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rocket_types::{RocketId, RocketState};

/// Storage contract for aggregated rocket state.
///
/// Implementations never fail: a save always succeeds and a lookup reports
/// absence through `None` rather than an error.
pub trait RocketStore: Send + Sync {
    /// Upserts the full state for `state.id`, replacing any previous value.
    fn save(&self, state: RocketState);

    /// Returns the current state for `id`, if one has been saved.
    fn get(&self, id: &RocketId) -> Option<RocketState>;

    /// Returns a snapshot of every stored state. Order is unspecified.
    fn list_all(&self) -> Vec<RocketState>;
}

/// [`RocketStore`] backed by a `HashMap` behind a reader/writer lock.
///
/// Uses `std::sync::RwLock`: every acquisition is a single map operation
/// that never spans an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryRocketStore {
    rockets: RwLock<HashMap<RocketId, RocketState>>,
}

impl InMemoryRocketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rockets currently stored.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no rocket has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<RocketId, RocketState>> {
        match self.rockets.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // A writer panicked mid-call. Each write replaces a whole
                // value, so the map itself is still consistent.
                tracing::error!("rocket store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RocketId, RocketState>> {
        match self.rockets.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("rocket store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl RocketStore for InMemoryRocketStore {
    fn save(&self, state: RocketState) {
        tracing::debug!(
            rocket_id = %state.id,
            sequence = state.last_sequence,
            status = %state.status,
            "rocket state saved"
        );
        self.write().insert(state.id, state);
    }

    fn get(&self, id: &RocketId) -> Option<RocketState> {
        self.read().get(id).cloned()
    }

    fn list_all(&self) -> Vec<RocketState> {
        self.read().values().cloned().collect()
    }
}
