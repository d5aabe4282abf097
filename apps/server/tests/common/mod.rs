#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use ledgerfolio_server::{
    api::app_router,
    build_state,
    config::{Config, LogFormat, StorageMode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";

pub fn memory_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: String::new(),
        storage: StorageMode::Memory,
        api_key: Some(API_KEY.to_string()),
        auth_enabled: true,
        dev_mode: false,
        portfolio_id: "default".to_string(),
        user_id: "default".to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        log_format: LogFormat::Text,
    }
}

pub fn sqlite_config(dir: &TempDir) -> Config {
    Config {
        db_path: dir.path().join("ledger.db").to_string_lossy().to_string(),
        storage: StorageMode::Sqlite,
        ..memory_config()
    }
}

pub async fn router_for(config: &Config) -> Router {
    let state = build_state(config).await.unwrap();
    app_router(state, config)
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", API_KEY));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (u16, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
