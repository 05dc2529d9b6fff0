use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Status code plus JSON body produced by a handler.
///
/// Kept independent of the router so handlers can be driven directly.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResponse {
    pub fn ok(body: impl Serialize) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn accepted(body: impl Serialize) -> Self {
        Self::with_status(StatusCode::ACCEPTED, body)
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "An unexpected error occurred".to_string()
        } else {
            message
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": message }),
        }
    }

    fn with_status(status: StatusCode, body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(format!("Failed to serialize response: {}", e)),
        }
    }

    /// The `error` field of a failure body, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
