//! HTTP handlers for telemetry ingestion and rocket queries.
//!
//! Wire payloads are decoded and validated here; only well-formed
//! [`TelemetryEvent`]s ever reach the aggregation engine.

use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Json, Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rocket_state::{RocketError, SortField, SortOrder};
use rocket_types::{EventKind, MessageType, RocketId, RocketState, TelemetryEvent};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Envelope metadata of an inbound telemetry message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// The rocket the message is about.
    pub channel: RocketId,
    /// Per-rocket sequence number.
    pub message_number: u64,
    /// Declared event time (RFC 3339).
    pub message_time: DateTime<Utc>,
    /// Message type name, e.g. `RocketLaunched`.
    pub message_type: String,
}

/// Kind-specific fields of an inbound telemetry message.
///
/// Every field is optional on the wire; which ones are required depends on
/// the message type and is checked when converting to a [`TelemetryEvent`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    #[serde(rename = "type")]
    pub rocket_type: Option<String>,
    pub launch_speed: Option<i64>,
    pub mission: Option<String>,
    pub by: Option<i64>,
    pub new_mission: Option<String>,
    pub reason: Option<String>,
}

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub metadata: MessageMetadata,
    #[serde(default)]
    pub message: MessageBody,
}

fn required<T>(
    value: Option<T>,
    message_type: MessageType,
    field: &'static str,
) -> Result<T, RocketError> {
    value.ok_or(RocketError::MissingField {
        message_type,
        field,
    })
}

impl TryFrom<IngestRequest> for TelemetryEvent {
    type Error = RocketError;

    fn try_from(req: IngestRequest) -> Result<Self, Self::Error> {
        let message_type: MessageType = req.metadata.message_type.parse()?;
        let body = req.message;

        let kind = match message_type {
            MessageType::Launched => EventKind::Launched {
                rocket_type: required(body.rocket_type, message_type, "type")?,
                launch_speed: required(body.launch_speed, message_type, "launchSpeed")?,
                mission: required(body.mission, message_type, "mission")?,
            },
            MessageType::SpeedIncreased => EventKind::SpeedIncreased {
                by: required(body.by, message_type, "by")?,
            },
            MessageType::SpeedDecreased => EventKind::SpeedDecreased {
                by: required(body.by, message_type, "by")?,
            },
            MessageType::MissionChanged => EventKind::MissionChanged {
                new_mission: required(body.new_mission, message_type, "newMission")?,
            },
            MessageType::Exploded => EventKind::Exploded {
                reason: body.reason,
            },
        };

        Ok(TelemetryEvent {
            rocket_id: req.metadata.channel,
            sequence: req.metadata.message_number,
            time: req.metadata.message_time,
            kind,
        })
    }
}

/// Query parameters for `GET /v1/rockets`.
#[derive(Debug, Default, Deserialize)]
pub struct ListRocketsQuery {
    /// Field to sort by (default `id`).
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `asc`).
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: "bad_request",
            message: message.into(),
        }
    }
}

impl From<RocketError> for ApiError {
    fn from(err: RocketError) -> Self {
        let code = match &err {
            RocketError::UnknownSortField(_) => "unknown_sort_by",
            RocketError::UnknownSortOrder(_) => "unknown_sort_order",
            RocketError::UnknownMessageType(_) => "unknown_message_type",
            RocketError::MissingField { .. } => "missing_field",
        };
        Self::BadRequest {
            code,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /messages`.
///
/// Responds `202 Accepted` whether the event was applied or dropped as
/// stale; the caller is not told which.
pub async fn ingest_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let event = TelemetryEvent::try_from(request).map_err(|e| {
        tracing::info!(error = %e, "rejecting telemetry message");
        ApiError::from(e)
    })?;

    state.rockets.process(&event);
    Ok(StatusCode::ACCEPTED)
}

/// Handler for `GET /v1/rockets`.
pub async fn list_rockets_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<ListRocketsQuery>, QueryRejection>,
) -> Result<Json<Vec<RocketState>>, ApiError> {
    let Query(params) = query?;
    let field = match params.sort_by.as_deref() {
        Some(raw) => raw.parse::<SortField>()?,
        None => SortField::Id,
    };
    let order = match params.sort_order.as_deref() {
        Some(raw) => raw.parse::<SortOrder>()?,
        None => SortOrder::Asc,
    };

    Ok(Json(state.rockets.list_sorted(Some(field), order)))
}

/// Handler for `GET /v1/rockets/{id}`.
pub async fn get_rocket_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RocketState>, ApiError> {
    let rocket_id: RocketId = id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid rocket id: {id}")))?;

    state
        .rockets
        .get(&rocket_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("rocket with id {rocket_id} not found")))
}
