//! Request forwarding to backends.
//!
//! # Responsibilities
//! - Rewrite the outbound URI onto the matched backend
//! - Rewrite origin headers (Host, X-Forwarded-*)
//! - Stream the request body to the backend and the response body back,
//!   without buffering either
//! - Surface connection failures as a distinguishable error
//!
//! # Design Decisions
//! - One shared hyper client; its pool reuses outbound connections but the
//!   contract only requires connection-per-request semantics
//! - Dropping the returned future (deadline or client disconnect) cancels
//!   the in-flight call and releases the outbound connection

use std::net::IpAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{request, Request, Uri};
use axum::response::Response;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::proxy::error::GatewayError;
use crate::proxy::headers::{apply_forwarding_headers, strip_hop_by_hop};
use crate::routing::RouteMatch;

/// Forwards admitted requests to their matched backend.
#[derive(Clone)]
pub struct ProxyForwarder {
    client: Client<HttpConnector, Body>,
}

impl ProxyForwarder {
    /// Create a forwarder with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        Self {
            client: Client::builder(TokioExecutor::new()).build(connector),
        }
    }

    /// Forward a request to the backend selected by `route`.
    ///
    /// Returns the backend's response with status, headers, and body
    /// relayed as they arrive. Connection failures map to
    /// [`GatewayError::BackendUnreachable`]. Cancellation is the caller's
    /// concern: dropping this future aborts the call.
    pub async fn forward(
        &self,
        parts: request::Parts,
        body: Body,
        route: &RouteMatch<'_>,
        client_ip: IpAddr,
    ) -> Result<Response, GatewayError> {
        let uri = build_target_uri(route, parts.uri.query())?;

        let mut headers = parts.headers;
        let original_host = headers.get("host").cloned();
        strip_hop_by_hop(&mut headers);
        apply_forwarding_headers(
            &mut headers,
            client_ip,
            original_host,
            &route.entry.authority,
        );

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(uri)
            .body(body)
            .map_err(|e| GatewayError::BackendUnreachable(e.to_string()))?;
        *outbound.headers_mut() = headers;

        let response = self.client.request(outbound).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Build the outbound URI: backend scheme + authority, target base path
/// joined with the rewritten path, original query preserved.
fn build_target_uri(route: &RouteMatch<'_>, query: Option<&str>) -> Result<Uri, GatewayError> {
    let entry = route.entry;

    let mut path_and_query = format!("{}{}", entry.base_path, route.rewritten_path);
    if let Some(query) = query {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let invalid = |e: &dyn std::fmt::Display| {
        GatewayError::BackendUnreachable(format!("invalid upstream URI: {}", e))
    };

    let scheme: Scheme = entry.scheme.parse().map_err(|e| invalid(&e))?;
    let authority: Authority = entry.authority.parse().map_err(|e| invalid(&e))?;
    let path_and_query: PathAndQuery = path_and_query.parse().map_err(|e| invalid(&e))?;

    Uri::builder()
        .scheme(scheme)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| invalid(&e))
}
