//! Rate limit admission tests against a running gateway.

use std::net::SocketAddr;
use std::time::Duration;

use edge_gateway::config::GatewayConfig;

mod common;

#[tokio::test]
async fn requests_over_limit_get_429_until_window_resets() {
    let backend_addr: SocketAddr = "127.0.0.1:29181".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29182".parse().unwrap();

    common::start_mock_backend(backend_addr, "ok").await;

    let mut config = GatewayConfig::default();
    config.routes.push(common::route_to("api", "/api", backend_addr));
    config.rate_limit.limit = 3;
    config.rate_limit.window_ms = 800;

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();
    let url = format!("http://{}/api/hello", proxy_addr);

    // First 3 requests admitted, the rest of the window rejected.
    for i in 1..=5 {
        let res = client.get(&url).send().await.expect("gateway unreachable");
        if i <= 3 {
            assert_eq!(res.status(), 200, "request {} should be admitted", i);
        } else {
            assert_eq!(res.status(), 429, "request {} should be rejected", i);
            let body: serde_json::Value = res.json().await.unwrap();
            assert_eq!(body["code"], 429);
            assert_eq!(body["status"], "Error");
            assert_eq!(body["message"], "Rate Limit Exceeded.");
            assert!(body["data"].is_null());
        }
    }

    // After the window ticks over, the budget is restored.
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200, "admission resumes after window reset");

    shutdown.trigger();
}

#[tokio::test]
async fn full_window_scenario_twenty_admitted_five_rejected() {
    let backend_addr: SocketAddr = "127.0.0.1:29183".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29184".parse().unwrap();

    common::start_mock_backend(backend_addr, "ok").await;

    // Default limit of 20 with a window comfortably longer than the test.
    let mut config = GatewayConfig::default();
    config.routes.push(common::route_to("api", "/api", backend_addr));

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();
    let url = format!("http://{}/api/x", proxy_addr);

    let mut statuses = Vec::new();
    for _ in 0..25 {
        let res = client.get(&url).send().await.expect("gateway unreachable");
        statuses.push(res.status().as_u16());
    }

    assert!(statuses[..20].iter().all(|&s| s == 200), "requests 1-20 admitted");
    assert!(statuses[20..].iter().all(|&s| s == 429), "requests 21-25 rejected");

    shutdown.trigger();
}

#[tokio::test]
async fn rejected_requests_never_reach_the_backend() {
    let backend_addr: SocketAddr = "127.0.0.1:29185".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29186".parse().unwrap();

    let mut seen = common::start_recording_backend(backend_addr).await;

    let mut config = GatewayConfig::default();
    config.routes.push(common::route_to("api", "/api", backend_addr));
    config.rate_limit.limit = 1;

    let shutdown = common::spawn_gateway(proxy_addr, config).await;
    let client = common::test_client();
    let url = format!("http://{}/api/only", proxy_addr);

    assert_eq!(client.get(&url).send().await.unwrap().status(), 200);
    assert_eq!(client.get(&url).send().await.unwrap().status(), 429);

    // Exactly one request made it through.
    assert!(seen.recv().await.is_some());
    assert!(seen.try_recv().is_err(), "rejected request must not be forwarded");

    shutdown.trigger();
}
