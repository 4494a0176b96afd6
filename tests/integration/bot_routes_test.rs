// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::json;
use std::net::SocketAddr;
use tower::util::ServiceExt;

use super::helpers::{body_bytes, body_json, post_json, test_app, TestAppConfig, ADMIN_TOKEN};

#[tokio::test]
async fn web_chat_replies_with_content() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .oneshot(post_json("/bots", &json!({ "message": "/帮助" }), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("目前豆豆可以提供以下查询功能"));
    assert!(content.ends_with("[🔗 DDNet 工具箱](https://teeworlds.cn/ddnet)"));
}

/// 玩家数据不可用时分数指令不回复
#[tokio::test]
async fn points_without_player_data_has_no_response() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .oneshot(post_json(
            "/bots",
            &json!({ "message": "/分数 TsFreddie" }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "content": "<No Response>" }));
}

#[tokio::test]
async fn missing_message_is_bad_request() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .oneshot(post_json("/bots", &json!({ "text": "hi" }), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("message is required"));
}

#[tokio::test]
async fn admin_modes_require_matching_token() {
    let app = test_app(TestAppConfig::default());

    for bearer in [None, Some("wrong")] {
        let response = app
            .clone()
            .oneshot(post_json("/bots?mode=getuser", &json!(null), bearer))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"Not Found");
    }

    let response = app
        .oneshot(post_json("/bots?mode=getuser", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "user": null }));
}

#[tokio::test]
async fn admin_modes_disabled_without_token() {
    let app = test_app(TestAppConfig {
        admin_token: None,
        ..TestAppConfig::default()
    });

    let response = app
        .oneshot(post_json(
            "/bots?mode=group",
            &json!({ "message": "/帮助" }),
            Some(ADMIN_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn group_mode_stays_quiet_on_unknown_command() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .oneshot(post_json(
            "/bots?mode=group",
            &json!({ "message": "随便说点什么" }),
            Some(ADMIN_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(body_json(response).await, json!({ "content": "<No Response>" }));
}

#[tokio::test]
async fn custom_reply_round_trip() {
    let app = test_app(TestAppConfig::default());
    let custom = json!({ "content": "自定义回复", "extra": [1, 2, 3] });

    let response = app
        .clone()
        .oneshot(post_json("/bots?mode=custom", &custom, Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(post_json("/bots", &json!({ "message": token }), None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, custom);

    let response = app
        .clone()
        .oneshot(post_json("/bots?mode=error", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, custom);

    let response = app
        .oneshot(post_json("/bots?mode=last", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    let last = body_json(response).await;
    assert_eq!(last["uid"], "web:127.0.0.1");
    assert_eq!(last["msg"], token);
    assert_eq!(last["mode"], "DIRECT");
    assert_eq!(last["result"], custom);
}

#[tokio::test]
async fn custom_reply_rejects_null_body() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .oneshot(post_json("/bots?mode=custom", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();

    assert_eq!(
        body_json(response).await,
        json!({ "error": true, "message": "custom command must have a body" })
    );
}

#[tokio::test]
async fn listen_to_user_is_settable() {
    let app = test_app(TestAppConfig::default());

    let response = app
        .clone()
        .oneshot(post_json("/bots?mode=user", &json!("qq:42"), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "user": "qq:42" }));

    let response = app
        .clone()
        .oneshot(post_json("/bots", &json!({ "message": "/工具箱" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/bots?mode=last", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!(null));

    let response = app
        .oneshot(post_json("/bots?mode=getuser", &json!(null), Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "user": "qq:42" }));
}

#[tokio::test]
async fn web_chat_is_rate_limited_per_ip() {
    let app = test_app(TestAppConfig {
        web_threshold: 2,
        ..TestAppConfig::default()
    });

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/bots", &json!({ "message": "/帮助" }), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post_json("/bots", &json!({ "message": "/帮助" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn local_endpoint_only_accepts_loopback() {
    let remote = test_app(TestAppConfig {
        peer: SocketAddr::from(([10, 0, 0, 8], 40000)),
        ..TestAppConfig::default()
    });
    let response = remote
        .oneshot(post_json("/bots/local", &json!({ "message": "/工具箱" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let local = test_app(TestAppConfig::default());
    let response = local
        .oneshot(post_json("/bots/local", &json!({ "message": "/__uid__" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "content": "您的 UID 是 cli:LOCAL" })
    );
}
