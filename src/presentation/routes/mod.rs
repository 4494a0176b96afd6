// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::bots::dispatcher::ChatDispatcher;
use crate::domain::services::rate_limiting_service::RateLimiter;
use crate::infrastructure::fetches::maps::MapCache;
use crate::infrastructure::fetches::servers::ServerCache;
use crate::presentation::handlers::{api_handler, bot_handler};
use crate::presentation::middleware::rate_limit_middleware::rate_limit_middleware;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ChatDispatcher>,
    pub maps: Arc<MapCache>,
    pub servers: Arc<ServerCache>,
    /// 管理接口令牌
    pub admin_token: Option<String>,
}

/// 创建应用路由
///
/// # 参数
///
/// * `state` - 路由共享状态
/// * `web_limiter` - `/bots` 使用的按 IP 限流器
///
/// # 返回值
///
/// 返回配置好的路由，需以 `into_make_service_with_connect_info` 启动
pub fn routes(state: AppState, web_limiter: Arc<RateLimiter>) -> Router {
    let limited_routes = Router::new()
        .route("/bots", post(bot_handler::web_chat))
        .layer(axum::middleware::from_fn_with_state(
            web_limiter,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/api/maps", get(api_handler::maps))
        .route("/api/servers", get(api_handler::servers))
        .route("/bots/local", post(bot_handler::local_chat))
        .merge(limited_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
