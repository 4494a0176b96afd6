// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Request},
    response::Response,
    Router,
};
use ddportal::bots::{build_router, dispatcher::ChatDispatcher};
use ddportal::domain::services::rate_limiting_service::{RateLimitConfig, RateLimiter};
use ddportal::infrastructure::cache::fetch_cache::FetchOptions;
use ddportal::infrastructure::cache::memory_store::MemoryStore;
use ddportal::infrastructure::fetches::maps::map_cache;
use ddportal::infrastructure::fetches::players::RankedPlayers;
use ddportal::infrastructure::fetches::servers::server_cache;
use ddportal::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use ddportal::presentation::routes::{self, AppState};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

/// 不可达的上游地址
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const ADMIN_TOKEN: &str = "secret-token";

/// 测试应用配置
pub struct TestAppConfig {
    pub admin_token: Option<&'static str>,
    pub maps_url: String,
    pub servers_url: String,
    pub peer: SocketAddr,
    pub web_threshold: usize,
}

impl Default for TestAppConfig {
    fn default() -> Self {
        Self {
            admin_token: Some(ADMIN_TOKEN),
            maps_url: format!("{}/maps.json", UNREACHABLE),
            servers_url: format!("{}/servers.json", UNREACHABLE),
            peer: SocketAddr::from(([127, 0, 0, 1], 40000)),
            web_threshold: 100,
        }
    }
}

/// 构建使用内存存储的完整路由
pub fn test_app(config: TestAppConfig) -> Router {
    let store = Arc::new(MemoryStore::new());
    let client = reqwest::Client::new();
    let options = FetchOptions::default();

    let users = Arc::new(UserRepositoryImpl::new(store.clone()));
    let maps = Arc::new(map_cache(
        &config.maps_url,
        store.clone(),
        options,
        client.clone(),
    ));
    let servers = Arc::new(server_cache(
        &config.servers_url,
        store.clone(),
        options,
        client.clone(),
    ));
    let players = Arc::new(RankedPlayers::new(
        &format!("{}/ranks.json", UNREACHABLE),
        store.clone(),
        options,
        client,
    ));

    let generous = RateLimitConfig {
        threshold: 100,
        interval: 60,
        cooldown: 60,
    };
    let dispatcher = Arc::new(ChatDispatcher::new(
        build_router(users.clone(), maps.clone(), players),
        RateLimiter::new(store.clone(), "chat", generous),
        users,
        1,
    ));
    let web_limiter = Arc::new(RateLimiter::new(
        store,
        "web",
        RateLimitConfig {
            threshold: config.web_threshold,
            ..generous
        },
    ));

    let state = AppState {
        dispatcher,
        maps,
        servers,
        admin_token: config.admin_token.map(str::to_string),
    };

    routes::routes(state, web_limiter).layer(MockConnectInfo(config.peer))
}

pub fn post_json(uri: &str, body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
