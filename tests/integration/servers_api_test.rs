// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{body_bytes, get, test_app, TestAppConfig};

const SERVERS: &str = r#"{"servers":[{"addresses":["tw-0.7+udp://1.2.3.4:8303"],"location":"as:cn","info":{"name":"DDNet CN","clients":[]}}]}"#;

#[tokio::test]
async fn servers_pass_through_upstream_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
                .set_body_string(SERVERS),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(TestAppConfig {
        servers_url: format!("{}/servers.json", server.uri()),
        ..TestAppConfig::default()
    });

    let response = app.clone().oneshot(get("/api/servers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cache"], "MISS");
    assert_eq!(response.headers()["cache-control"], "public, max-age=10");
    assert_eq!(body_bytes(response).await, SERVERS.as_bytes());

    let response = app.oneshot(get("/api/servers")).await.unwrap();
    assert_eq!(response.headers()["x-cache"], "HIT");
    assert_eq!(body_bytes(response).await, SERVERS.as_bytes());
}

#[tokio::test]
async fn servers_unavailable_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = test_app(TestAppConfig {
        servers_url: format!("{}/servers.json", server.uri()),
        ..TestAppConfig::default()
    });

    let response = app.oneshot(get("/api/servers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
