// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{body_json, get, test_app, TestAppConfig};

fn maps_body() -> Value {
    json!([
        {
            "name": "Kobra",
            "website": "https://ddnet.org/maps/Kobra",
            "type": "Novice",
            "points": 5,
            "difficulty": 1,
            "mapper": "Zerodin",
            "release": "2014-03-02 16:00:00",
            "thumbnail": "https://ddnet.org/ranks/maps/Kobra.png"
        }
    ])
}

#[tokio::test]
async fn maps_are_served_from_cache_after_first_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "\"v1\"")
                .set_body_json(maps_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(TestAppConfig {
        maps_url: format!("{}/maps.json", server.uri()),
        ..TestAppConfig::default()
    });

    let response = app.clone().oneshot(get("/api/maps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cache"], "MISS");
    assert_eq!(response.headers()["content-type"], "application/json");
    let maps = body_json(response).await;
    assert_eq!(maps[0]["name"], "Kobra");
    assert_eq!(maps[0]["type"], "Novice");
    assert!(maps[0].get("website").is_none());

    let response = app.oneshot(get("/api/maps")).await.unwrap();
    assert_eq!(response.headers()["x-cache"], "HIT");
    assert_eq!(body_json(response).await, maps);
}

#[tokio::test]
async fn maps_unavailable_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let app = test_app(TestAppConfig {
        maps_url: format!("{}/maps.json", server.uri()),
        ..TestAppConfig::default()
    });

    let response = app.oneshot(get("/api/maps")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
