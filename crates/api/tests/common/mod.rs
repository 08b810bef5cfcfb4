#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use zerostat_agent::collector::{MetricsSource, RawReading};
use zerostat_agent::dispatcher::ActionDispatcher;
use zerostat_agent::persistence::{RuleFile, SettingsFile};
use zerostat_agent::sampler::Sampler;
use zerostat_agent::shell::ShellRunner;
use zerostat_agent::store::RuleStore;
use zerostat_api::config::ServerConfig;
use zerostat_api::router::build_app_router;
use zerostat_api::state::AppState;
use zerostat_events::{NotificationConfig, Notifier};

/// Metrics source that always reports the same host.
pub struct FixedHost;

impl MetricsSource for FixedHost {
    fn read(&mut self) -> RawReading {
        RawReading {
            cpu_percent: 42.5,
            cpu_cores: 8,
            mem_used_bytes: 4 * 1024 * 1024 * 1024,
            mem_total_bytes: 16 * 1024 * 1024 * 1024,
            disk_used_bytes: 250,
            disk_total_bytes: 1000,
            net_rx_bytes: 10_000,
            net_tx_bytes: 5_000,
        }
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    }
}

/// Build the application state with a fixed metrics source, no notification
/// channels configured, and the data files stored under `data_dir`.
pub fn test_state(data_dir: &Path) -> AppState {
    let dispatcher = Arc::new(ActionDispatcher::new(
        Arc::new(Notifier::new(NotificationConfig::default())),
        ShellRunner::default(),
        "test-host",
    ));

    AppState::new(
        test_config(),
        Arc::new(RuleStore::new()),
        Arc::new(Sampler::new(Box::new(FixedHost))),
        dispatcher,
        RuleFile::in_dir(data_dir),
        SettingsFile::in_dir(data_dir),
    )
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
