//! Routing, forwarding, and deadline tests against a running gateway.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use edge_gateway::config::GatewayConfig;

mod common;

#[tokio::test]
async fn strips_prefix_and_relays_backend_response() {
    let backend_addr: SocketAddr = "127.0.0.1:29281".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29282".parse().unwrap();

    let mut seen = common::start_recording_backend(backend_addr).await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("users", "/users", backend_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/users/42", proxy_addr))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    let head = seen.recv().await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert_eq!(request_line, "GET /42 HTTP/1.1", "prefix must be stripped");

    shutdown.trigger();
}

#[tokio::test]
async fn rewrites_origin_headers_for_the_backend() {
    let backend_addr: SocketAddr = "127.0.0.1:29283".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29284".parse().unwrap();

    let mut seen = common::start_recording_backend(backend_addr).await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("auth", "/auth", backend_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    client
        .get(format!("http://{}/auth/login", proxy_addr))
        .send()
        .await
        .expect("gateway unreachable");

    let head = seen.recv().await.unwrap().to_lowercase();
    assert!(
        head.contains(&format!("host: {}", backend_addr)),
        "backend must see the gateway as origin: {}",
        head
    );
    assert!(head.contains("x-forwarded-for: 127.0.0.1"), "{}", head);
    assert!(head.contains("x-forwarded-proto: http"), "{}", head);

    shutdown.trigger();
}

#[tokio::test]
async fn slow_backend_gets_504_within_the_deadline() {
    let backend_addr: SocketAddr = "127.0.0.1:29285".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29286".parse().unwrap();

    // Backend sleeps well past the configured deadline.
    common::start_slow_backend(backend_addr, Duration::from_secs(5)).await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("slow", "/slow", backend_addr));
    config.timeouts.request_ms = 500;

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let start = Instant::now();
    let res = client
        .get(format!("http://{}/slow/x", proxy_addr))
        .send()
        .await
        .expect("gateway unreachable");
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 504);
    assert!(
        elapsed < Duration::from_secs(3),
        "504 must arrive at the deadline, not when the backend finishes (took {:?})",
        elapsed
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], 504);
    assert_eq!(body["message"], "Gateway Timeout");
    assert!(body["data"].is_null());

    shutdown.trigger();
}

#[tokio::test]
async fn fast_backend_response_wins_over_deadline() {
    let backend_addr: SocketAddr = "127.0.0.1:29287".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29288".parse().unwrap();

    common::start_mock_backend(backend_addr, "fast").await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("fast", "/fast", backend_addr));
    config.timeouts.request_ms = 2_000;

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/fast/x", proxy_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "fast");

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_backend_is_502_not_504() {
    let proxy_addr: SocketAddr = "127.0.0.1:29289".parse().unwrap();
    // Nothing listens on this backend port.
    let backend_addr: SocketAddr = "127.0.0.1:29290".parse().unwrap();

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("down", "/down", backend_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/down/x", proxy_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], 502);
    assert_eq!(body["message"], "Upstream Unreachable");

    shutdown.trigger();
}

#[tokio::test]
async fn unrouted_path_falls_through_to_404() {
    let backend_addr: SocketAddr = "127.0.0.1:29291".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29292".parse().unwrap();

    common::start_mock_backend(backend_addr, "ok").await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("users", "/users", backend_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/orders/1", proxy_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], 404);
    assert_eq!(body["status"], "Error");

    shutdown.trigger();
}

#[tokio::test]
async fn serves_sequential_requests_under_a_tight_connection_cap() {
    let backend_addr: SocketAddr = "127.0.0.1:29296".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29297".parse().unwrap();

    common::start_mock_backend(backend_addr, "ok").await;

    // One connection slot: each request must release its permit for the
    // next one to be accepted at all.
    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("api", "/api", backend_addr));
    config.listener.max_connections = 1;

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();
    let url = format!("http://{}/api/x", proxy_addr);

    for i in 1..=3 {
        let res = client.get(&url).send().await.expect("gateway unreachable");
        assert_eq!(res.status(), 200, "request {} under cap", i);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn first_matching_route_wins_for_overlapping_prefixes() {
    let first_addr: SocketAddr = "127.0.0.1:29293".parse().unwrap();
    let second_addr: SocketAddr = "127.0.0.1:29294".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29295".parse().unwrap();

    common::start_mock_backend(first_addr, "first").await;
    common::start_mock_backend(second_addr, "second").await;

    let mut config = GatewayConfig::default();
    config
        .routes
        .push(common::route_to("first", "/api", first_addr));
    config
        .routes
        .push(common::route_to("second", "/api", second_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/api/x", proxy_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.text().await.unwrap(), "first");

    shutdown.trigger();
}
