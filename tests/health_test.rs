//! # 健康检查测试

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{StubModel, app, body_json, request_from, send};

#[tokio::test]
async fn health_returns_ok_with_current_timestamp() {
    let model = StubModel::new();
    let app = app(model.clone());

    let before = Utc::now();
    let response = send(&app, request_from([127, 0, 0, 1], "GET", "/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    let timestamp = DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).unwrap();
    assert!(timestamp.with_timezone(&Utc) >= before - chrono::Duration::seconds(1));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn health_is_not_rate_limited() {
    let mut config = common::test_config();
    config.rate_limit.max_requests = 1;
    let app = common::app_with(config, StubModel::new());

    for _ in 0..5 {
        let response = send(&app, request_from([10, 0, 0, 9], "GET", "/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }
}

#[tokio::test]
async fn unknown_routes_return_json_404() {
    let app = app(StubModel::new());

    for uri in ["/nope", "/api/nope"] {
        let response = send(&app, request_from([127, 0, 0, 1], "GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }
}

#[tokio::test]
async fn inbound_request_id_is_echoed_and_bad_ones_replaced() {
    let app = app(StubModel::new());

    let mut request = request_from([127, 0, 0, 1], "GET", "/health", None);
    request
        .headers_mut()
        .insert("x-request-id", "gw-01HZX9_trace".parse().unwrap());
    let response = send(&app, request).await;
    assert_eq!(response.headers()["x-request-id"], "gw-01HZX9_trace");

    let mut request = request_from([127, 0, 0, 1], "GET", "/health", None);
    request
        .headers_mut()
        .insert("x-request-id", "not allowed".parse().unwrap());
    let response = send(&app, request).await;
    let echoed = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(echoed).is_ok());
}
