//! Error types for the rocket state layer.

use rocket_types::{MessageType, ParseMessageTypeError};

/// Errors raised while turning caller input into engine input.
///
/// None of these can come out of the store or the aggregation engine
/// themselves; they describe input that must be rejected before it reaches
/// them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RocketError {
    /// The sort field is not one of the sortable fields.
    #[error("unknown sort by: {0}")]
    UnknownSortField(String),

    /// The sort order is neither `asc` nor `desc`.
    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),

    /// The message type string is not a known telemetry message type.
    #[error(transparent)]
    UnknownMessageType(#[from] ParseMessageTypeError),

    /// A field required by the message type is absent.
    #[error("{message_type} message is missing required field `{field}`")]
    MissingField {
        message_type: MessageType,
        field: &'static str,
    },
}
