//! Shared helpers for driving the router in integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn message(channel: &str, number: u64, message_type: &str, message: Value) -> Value {
    json!({
        "metadata": {
            "channel": channel,
            "messageNumber": number,
            "messageTime": format!("2022-02-02T19:{:02}:05.86337+01:00", number % 60),
            "messageType": message_type,
        },
        "message": message,
    })
}

pub fn launch(channel: &str, number: u64, rocket_type: &str, speed: i64, mission: &str) -> Value {
    message(
        channel,
        number,
        "RocketLaunched",
        json!({ "type": rocket_type, "launchSpeed": speed, "mission": mission }),
    )
}
