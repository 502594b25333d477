//! Contract Test: GET /status, GET /status/:server_type

use crate::support::{build_app, build_app_with};
use async_trait::async_trait;
use axum::http::StatusCode;
use realm_portal::health::{LivenessMonitor, ProbeOutcome, Prober, TcpProbe};
use realm_portal_common::{config::MonitoredEndpoint, error::ProbeError, types::EndpointState};
use std::sync::Arc;
use std::time::Duration;

struct FixedProbe(ProbeOutcome);

#[async_trait]
impl Prober for FixedProbe {
    async fn probe(
        &self,
        _host: &str,
        _port: u16,
        _timeout: Duration,
    ) -> Result<ProbeOutcome, ProbeError> {
        Ok(self.0.clone())
    }
}

/// いずれかの確定状態（Up / Down / Error）になるまで待つ
async fn wait_until_settled(monitor: &LivenessMonitor, id: &str) -> EndpointState {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let state = monitor.status_of(id).await.expect("endpoint registered").state;
        if !matches!(state, EndpointState::Unknown | EndpointState::Checking) {
            return state;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "{id} did not settle in time"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn unknown_server_type_returns_404() {
    let app = build_app().await;

    let (status, body) = app.get("/status/auth").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Unknown server");
}

#[tokio::test]
async fn registered_endpoint_is_unknown_before_first_check() {
    let monitor = LivenessMonitor::new(Arc::new(FixedProbe(ProbeOutcome::Up)));
    monitor
        .register(MonitoredEndpoint::new("login", "localhost", 2106))
        .await
        .unwrap();
    let app = build_app_with(monitor.status_table(), Duration::from_secs(600)).await;

    let (status, body) = app.get("/status/login").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], "unknown");
}

#[tokio::test]
async fn status_reflects_probe_result() {
    let monitor = LivenessMonitor::new(Arc::new(FixedProbe(ProbeOutcome::Up)))
        .with_interval(Duration::from_secs(5));
    monitor
        .register(MonitoredEndpoint::new("game", "localhost", 7777))
        .await
        .unwrap();
    let app = build_app_with(monitor.status_table(), Duration::from_secs(600)).await;

    monitor.start().await;
    assert_eq!(wait_until_settled(&monitor, "game").await, EndpointState::Up);

    let (status, body) = app.get("/status/game").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "up");

    // 末尾スラッシュ付きでも同じ結果
    let (status, body) = app.get("/status/game/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "up");

    monitor.shutdown().await;
}

#[tokio::test]
async fn reachable_and_unreachable_endpoints_are_reported_independently() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_port = listener.local_addr().unwrap().port();
    let closed_port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap().port()
    };
    let accept_task = tokio::spawn(async move {
        loop {
            if listener.accept().await.is_err() {
                break;
            }
        }
    });

    let monitor = LivenessMonitor::new(Arc::new(TcpProbe))
        .with_interval(Duration::from_secs(5))
        .with_timeout(Duration::from_millis(500));
    monitor
        .register(MonitoredEndpoint::new("login", "127.0.0.1", open_port))
        .await
        .unwrap();
    monitor
        .register(MonitoredEndpoint::new("game", "127.0.0.1", closed_port))
        .await
        .unwrap();
    let app = build_app_with(monitor.status_table(), Duration::from_secs(600)).await;

    monitor.start().await;
    assert_eq!(wait_until_settled(&monitor, "login").await, EndpointState::Up);
    assert_eq!(wait_until_settled(&monitor, "game").await, EndpointState::Down);

    let (_, login) = app.get("/status/login").await;
    let (_, game) = app.get("/status/game").await;
    assert_eq!(login["data"], "up");
    assert_eq!(game["data"], "down");

    let (status, list) = app.get("/status").await;
    assert_eq!(status, StatusCode::OK);
    let entries = list["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "game");
    assert!(!entries[0]["last_error"].as_str().unwrap().is_empty());
    assert_eq!(entries[1]["id"], "login");
    assert!(entries[1].get("last_error").is_none());

    monitor.shutdown().await;
    accept_task.abort();
}
