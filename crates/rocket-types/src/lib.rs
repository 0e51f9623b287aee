//! Shared types for the rocket telemetry service.
//!
//! This crate holds the data model every other crate speaks: the aggregated
//! [`RocketState`] kept per rocket, and the transient [`TelemetryEvent`] that
//! is folded into it. It carries no behaviour beyond construction and string
//! conversions, so the store, the aggregation engine and the HTTP adapter can
//! all depend on it without depending on each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a tracked rocket (the telemetry channel).
pub type RocketId = Uuid;

/// Lifecycle status of a rocket as derived from its events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RocketStatus {
    /// Placeholder before any launch or explosion has been applied.
    #[default]
    Unknown,
    /// The rocket has launched.
    Launched,
    /// The rocket has exploded.
    Exploded,
}

impl RocketStatus {
    /// Returns the canonical string label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Launched => "LAUNCHED",
            Self::Exploded => "EXPLODED",
        }
    }
}

impl std::fmt::Display for RocketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current aggregated state of one rocket.
///
/// One value exists per [`RocketId`]; it is created on the first accepted
/// event and overwritten in full on every subsequent accepted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RocketState {
    /// The rocket identifier.
    pub id: RocketId,
    /// Free-form rocket type label (e.g. `Falcon-9`).
    #[serde(rename = "type")]
    pub rocket_type: String,
    /// Current speed. May go negative if decreases outpace increases.
    #[serde(rename = "currentSpeed")]
    pub speed: i64,
    /// Current mission label.
    pub mission: String,
    /// Current lifecycle status.
    pub status: RocketStatus,
    /// Explosion reason, only ever set by an explosion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Declared time of the most recently applied event.
    pub last_update_time: DateTime<Utc>,
    /// Sequence number of the most recently applied event.
    #[serde(rename = "lastProcessedMessageNumber")]
    pub last_sequence: u64,
}

impl RocketState {
    /// Returns the state of a rocket that has not had any event applied yet.
    pub fn new(id: RocketId) -> Self {
        Self {
            id,
            rocket_type: String::new(),
            speed: 0,
            mission: String::new(),
            status: RocketStatus::Unknown,
            reason: None,
            last_update_time: DateTime::<Utc>::UNIX_EPOCH,
            last_sequence: 0,
        }
    }
}

/// Wire-level name of each telemetry message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Launched,
    SpeedIncreased,
    SpeedDecreased,
    MissionChanged,
    Exploded,
}

impl MessageType {
    /// Returns the canonical wire name for this message type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Launched => "RocketLaunched",
            Self::SpeedIncreased => "RocketSpeedIncreased",
            Self::SpeedDecreased => "RocketSpeedDecreased",
            Self::MissionChanged => "RocketMissionChanged",
            Self::Exploded => "RocketExploded",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = ParseMessageTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RocketLaunched" => Ok(Self::Launched),
            "RocketSpeedIncreased" => Ok(Self::SpeedIncreased),
            "RocketSpeedDecreased" => Ok(Self::SpeedDecreased),
            "RocketMissionChanged" => Ok(Self::MissionChanged),
            "RocketExploded" => Ok(Self::Exploded),
            _ => Err(ParseMessageTypeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown message type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMessageTypeError(pub String);

impl std::fmt::Display for ParseMessageTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown message type: {}", self.0)
    }
}

impl std::error::Error for ParseMessageTypeError {}

/// Kind-specific payload of a telemetry event.
///
/// Each variant carries exactly the fields its transition needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The rocket launched with an initial speed and mission.
    Launched {
        rocket_type: String,
        launch_speed: i64,
        mission: String,
    },
    /// Speed increased by `by`.
    SpeedIncreased { by: i64 },
    /// Speed decreased by `by`.
    SpeedDecreased { by: i64 },
    /// The mission was reassigned.
    MissionChanged { new_mission: String },
    /// The rocket exploded.
    Exploded { reason: Option<String> },
}

impl EventKind {
    /// Returns the wire message type this payload corresponds to.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Launched { .. } => MessageType::Launched,
            Self::SpeedIncreased { .. } => MessageType::SpeedIncreased,
            Self::SpeedDecreased { .. } => MessageType::SpeedDecreased,
            Self::MissionChanged { .. } => MessageType::MissionChanged,
            Self::Exploded { .. } => MessageType::Exploded,
        }
    }
}

/// A single sequenced, timestamped fact about one rocket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    /// The rocket this event describes.
    pub rocket_id: RocketId,
    /// Per-rocket sequence number, strictly increasing at the source.
    pub sequence: u64,
    /// Time the event was declared to have happened.
    pub time: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}
