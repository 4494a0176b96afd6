// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use tower::util::ServiceExt;

use super::helpers::{body_bytes, get, test_app, TestAppConfig};

/// 健康检查测试
#[tokio::test]
async fn health_check_works() {
    let app = test_app(TestAppConfig::default());

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn version_reports_package_version() {
    let app = test_app(TestAppConfig::default());

    let response = app.oneshot(get("/version")).await.unwrap();

    assert_eq!(
        body_bytes(response).await,
        env!("CARGO_PKG_VERSION").as_bytes()
    );
}
