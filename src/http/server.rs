//! HTTP server setup and request pipeline.
//!
//! # Responsibilities
//! - Create Axum Router with the wildcard gateway handler
//! - Wire up middleware (tracing, request ID)
//! - Spawn the rate-limit reset task
//! - Run the per-request pipeline: admit → arm deadline → route → forward
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::lifecycle::ShutdownSignal;
use crate::net::BoundedListener;
use crate::observability::metrics;
use crate::proxy::{DeadlineGuard, GatewayError, Outcome, ProxyForwarder};
use crate::routing::RouteTable;
use crate::security::RateLimiter;

/// Application state injected into the gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub routes: Arc<RouteTable>,
    pub forwarder: ProxyForwarder,
    pub request_timeout: Duration,
}

/// HTTP server for the edge gateway.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiter>,
    max_connections: usize,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let routes = Arc::new(RouteTable::from_config(&config.routes));
        let forwarder = ProxyForwarder::new(Duration::from_millis(config.timeouts.connect_ms));

        tracing::info!(
            routes = routes.len(),
            rate_limit = config.rate_limit.limit,
            window_ms = config.rate_limit.window_ms,
            request_timeout_ms = config.timeouts.request_ms,
            "Gateway pipeline initialized"
        );

        let state = AppState {
            limiter: limiter.clone(),
            routes,
            forwarder,
            request_timeout: Duration::from_millis(config.timeouts.request_ms),
        };

        Self {
            router: Self::build_router(state),
            limiter,
            max_connections: config.listener.max_connections,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on ctrl-c or when `shutdown` fires. The global rate-limit
    /// reset task runs for the lifetime of the server, and the listener is
    /// bounded to the configured connection cap.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_connections = self.max_connections,
            "Gateway listening"
        );

        tokio::spawn(
            self.limiter
                .clone()
                .run_reset_task(shutdown.resubscribe()),
        );

        // The no-op tap lets axum's blanket `Connected` impl for tapped
        // listeners supply `ConnectInfo<SocketAddr>`; a direct impl for a
        // custom listener is forbidden by the orphan rules.
        use axum::serve::ListenerExt;
        let listener = BoundedListener::new(listener, self.max_connections).tap_io(|_| {});
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Main gateway handler: the full admission and forwarding pipeline.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    // 1. Admission: rejected requests never touch a backend.
    if !state.limiter.admit(addr.ip()) {
        tracing::warn!(client = %addr.ip(), path = %path, "Rate limit exceeded");
        metrics::record_rate_limited();
        metrics::record_request(&method, 429, "none", start);
        return GatewayError::AdmissionRejected.into_response();
    }

    // 2. Deadline armed at admission time.
    let deadline = DeadlineGuard::arm(state.request_timeout);

    // 3. Route lookup.
    let Some(route) = state.routes.match_path(&path) else {
        tracing::debug!(path = %path, "No route matched");
        metrics::record_request(&method, 404, "none", start);
        return GatewayError::RouteNotFound.into_response();
    };
    let route_name = route.entry.name.clone();

    tracing::debug!(
        client = %addr.ip(),
        method = %method,
        path = %path,
        route = %route_name,
        rewritten = %route.rewritten_path,
        "Forwarding request"
    );

    // 4. Forward, racing the deadline. Exactly one branch produces the
    //    client-visible outcome.
    let (parts, body) = request.into_parts();
    let forward = state.forwarder.forward(parts, body, &route, addr.ip());

    match deadline.watch(forward).await {
        Outcome::Completed(Ok(response)) => {
            metrics::record_request(&method, response.status().as_u16(), &route_name, start);
            response
        }
        Outcome::Completed(Err(e)) => {
            tracing::error!(route = %route_name, error = %e, "Upstream error");
            metrics::record_request(&method, e.status().as_u16(), &route_name, start);
            e.into_response()
        }
        Outcome::TimedOut => {
            tracing::warn!(
                route = %route_name,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Deadline exceeded, backend call cancelled"
            );
            metrics::record_timeout(&route_name);
            metrics::record_request(&method, 504, &route_name, start);
            GatewayError::DeadlineExceeded.into_response()
        }
    }
}

/// Wait for ctrl-c or the shutdown coordinator.
async fn shutdown_signal(mut shutdown: ShutdownSignal) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
