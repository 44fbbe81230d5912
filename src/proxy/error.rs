//! Error taxonomy for the request pipeline.
//!
//! Every variant converts into a gateway-origin JSON response at the point
//! of occurrence; none of them propagates far enough to take the process
//! down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::error_response;

/// Client-visible failures of the admission and forwarding pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Client exceeded its window budget. Not retried by the gateway.
    #[error("rate limit exceeded")]
    AdmissionRejected,

    /// Backend did not produce response headers within the deadline.
    /// The in-flight backend call was cancelled, not retried.
    #[error("deadline exceeded waiting for backend")]
    DeadlineExceeded,

    /// Connection to the backend failed or was refused. Distinct from a
    /// timeout; the backend was never reached.
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    /// No configured prefix matches the request path.
    #[error("no route matches path")]
    RouteNotFound,
}

impl GatewayError {
    /// HTTP status this error surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::AdmissionRejected => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message placed in the JSON envelope sent to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            GatewayError::AdmissionRejected => "Rate Limit Exceeded.",
            GatewayError::DeadlineExceeded => "Gateway Timeout",
            GatewayError::BackendUnreachable(_) => "Upstream Unreachable",
            GatewayError::RouteNotFound => "Not Found",
        }
    }
}

impl From<hyper_util::client::legacy::Error> for GatewayError {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        GatewayError::BackendUnreachable(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.client_message())
    }
}
