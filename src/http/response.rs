//! Gateway-origin response bodies.
//!
//! # Responsibilities
//! - Produce the JSON envelope for responses the gateway originates
//!   (429, 504, 502, 404)
//!
//! # Design Decisions
//! - Backend responses are relayed untouched; only gateway-origin
//!   responses carry this envelope
//! - One shape for every gateway-origin response:
//!   `{code, status: "Error", message, data: null}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// JSON envelope for responses the gateway produces itself.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub status: &'static str,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Build a gateway-origin error response with the standard envelope.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        status: "Error",
        message: message.into(),
        data: None,
    };
    (status, Json(body)).into_response()
}
