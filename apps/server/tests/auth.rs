mod common;

use axum::{
    body::Body,
    http::{header, Request},
};
use tower::ServiceExt;

use common::{memory_config, request, router_for, API_KEY};

async fn status_with_header(value: Option<&str>) -> u16 {
    let app = router_for(&memory_config()).await;
    let mut builder = Request::builder().uri("/api/v1/portfolio");
    if let Some(value) = value {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
        .as_u16()
}

#[tokio::test]
async fn protected_routes_require_bearer_key() {
    assert_eq!(status_with_header(None).await, 401);
    assert_eq!(status_with_header(Some(API_KEY)).await, 401);
    assert_eq!(status_with_header(Some("Basic test-key")).await, 401);
    assert_eq!(status_with_header(Some("Bearer nope")).await, 401);
    assert_eq!(
        status_with_header(Some(&format!("Bearer {}", API_KEY))).await,
        200
    );
}

#[tokio::test]
async fn every_protected_surface_is_guarded() {
    let app = router_for(&memory_config()).await;
    for uri in ["/api/v1/tools", "/api/v1/watchlists", "/api/v1/portfolio"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 401, "{uri} should be protected");
    }
}

#[tokio::test]
async fn dev_mode_bypasses_auth() {
    let config = ledgerfolio_server::config::Config {
        dev_mode: true,
        api_key: None,
        ..memory_config()
    };
    let app = router_for(&config).await;

    let response = app
        .oneshot(Request::builder().uri("/api/v1/portfolio").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn disabled_auth_bypasses_check() {
    let config = ledgerfolio_server::config::Config {
        auth_enabled: false,
        ..memory_config()
    };
    let app = router_for(&config).await;

    let response = app
        .oneshot(Request::builder().uri("/api/v1/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn missing_key_fails_state_construction() {
    let config = ledgerfolio_server::config::Config {
        api_key: None,
        ..memory_config()
    };
    assert!(ledgerfolio_server::build_state(&config).await.is_err());

    // Credentials are accepted through the shared helper too.
    let app = router_for(&memory_config()).await;
    let response = app
        .oneshot(request(axum::http::Method::GET, "/api/v1/watchlists", None))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}
