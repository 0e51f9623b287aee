//! Aggregation of telemetry events into rocket state, and listing.
//!
//! [`RocketService::process`] folds one event into the stored state of its
//! rocket. Events whose sequence number does not exceed the last applied one
//! are dropped without touching the store. A late event that arrives after a
//! higher-numbered one has been applied is therefore lost for good; there is
//! no replay.
//!
//! `process` reads, computes and then saves. The store guards each of those
//! calls individually but not the sequence as a whole, so two concurrent
//! `process` calls for the same rocket can race and the last save wins.
//! Callers that need strict per-rocket ordering must serialise upstream.

use std::sync::Arc;

use rocket_types::{EventKind, RocketId, RocketState, RocketStatus, TelemetryEvent};

use crate::listing::{sort_states, SortField, SortOrder};
use crate::store::RocketStore;

/// Result of feeding one event to [`RocketService::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The event passed the sequence check and its effect was saved.
    Applied {
        /// `true` when this was the first accepted event for the rocket.
        created: bool,
        /// The state as written to the store.
        state: RocketState,
    },
    /// The event was stale or a duplicate; nothing was written.
    Dropped {
        /// The last applied sequence number that caused the drop.
        last_sequence: u64,
    },
}

impl ProcessOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Applies the kind-specific effect of `event` to `state`, then stamps the
/// event's sequence number and time.
///
/// No cross-field validation is done: a speed change on a rocket that never
/// launched is applied arithmetically all the same.
pub fn apply_event(mut state: RocketState, event: &TelemetryEvent) -> RocketState {
    match &event.kind {
        EventKind::Launched {
            rocket_type,
            launch_speed,
            mission,
        } => {
            state.rocket_type = rocket_type.clone();
            state.speed = *launch_speed;
            state.mission = mission.clone();
            state.status = RocketStatus::Launched;
        }
        EventKind::SpeedIncreased { by } => {
            state.speed = state.speed.saturating_add(*by);
        }
        EventKind::SpeedDecreased { by } => {
            state.speed = state.speed.saturating_sub(*by);
        }
        EventKind::MissionChanged { new_mission } => {
            state.mission = new_mission.clone();
        }
        EventKind::Exploded { reason } => {
            state.speed = 0;
            state.status = RocketStatus::Exploded;
            state.reason = reason.clone();
        }
    }

    state.last_sequence = event.sequence;
    state.last_update_time = event.time;
    state
}

/// Entry point for ingesting events and querying rocket state.
#[derive(Clone)]
pub struct RocketService {
    store: Arc<dyn RocketStore>,
}

impl RocketService {
    pub fn new(store: Arc<dyn RocketStore>) -> Self {
        Self { store }
    }

    /// Folds one telemetry event into the stored state of its rocket.
    pub fn process(&self, event: &TelemetryEvent) -> ProcessOutcome {
        let message_type = event.kind.message_type();
        tracing::info!(
            rocket_id = %event.rocket_id,
            message_type = %message_type,
            sequence = event.sequence,
            "processing telemetry message"
        );

        let (current, created) = match self.store.get(&event.rocket_id) {
            Some(existing) => {
                if event.sequence <= existing.last_sequence {
                    tracing::info!(
                        rocket_id = %event.rocket_id,
                        message_type = %message_type,
                        sequence = event.sequence,
                        last_sequence = existing.last_sequence,
                        "ignoring stale or duplicate message"
                    );
                    return ProcessOutcome::Dropped {
                        last_sequence: existing.last_sequence,
                    };
                }
                (existing, false)
            }
            None => {
                tracing::info!(rocket_id = %event.rocket_id, "new rocket detected");
                (RocketState::new(event.rocket_id), true)
            }
        };

        let state = apply_event(current, event);
        self.store.save(state.clone());

        tracing::info!(
            rocket_id = %state.id,
            speed = state.speed,
            status = %state.status,
            sequence = state.last_sequence,
            "rocket state updated"
        );

        ProcessOutcome::Applied { created, state }
    }

    /// Returns the current state of one rocket, if it has been seen.
    pub fn get(&self, id: &RocketId) -> Option<RocketState> {
        self.store.get(id)
    }

    /// Lists every rocket ordered by a string-named field.
    ///
    /// An empty or unrecognised `sort_by` returns the store snapshot as-is.
    /// `sort_order` is descending only when it reads `desc` in any case.
    pub fn list_all(&self, sort_by: &str, sort_order: &str) -> Vec<RocketState> {
        if sort_by.is_empty() {
            return self.store.list_all();
        }
        match sort_by.parse::<SortField>() {
            Ok(field) => self.list_sorted(Some(field), SortOrder::from_lenient(sort_order)),
            Err(_) => {
                tracing::debug!(sort_by, "unrecognised sort field, returning unsorted");
                self.store.list_all()
            }
        }
    }

    /// Lists every rocket, ordered by `field` when one is given.
    pub fn list_sorted(&self, field: Option<SortField>, order: SortOrder) -> Vec<RocketState> {
        let mut rockets = self.store.list_all();
        if let Some(field) = field {
            sort_states(&mut rockets, field, order);
        }
        rockets
    }
}

impl std::fmt::Debug for RocketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocketService").finish_non_exhaustive()
    }
}
