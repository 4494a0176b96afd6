// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, warn};

use crate::domain::services::rate_limiting_service::RateLimiter;

/// 按客户端 IP 的速率限制中间件
///
/// # 参数
///
/// * `limiter` - 网页端限流器
/// * `addr` - 客户端地址
/// * `request` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// 被限流时返回 429，否则返回后续处理的响应
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    match limiter.is_limited(&ip, "").await {
        Ok(decision) if decision.limited => {
            warn!(ip = %ip, triggered = decision.triggered, "Web request rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Too many requests" })),
            )
                .into_response()
        }
        Ok(_) => next.run(request).await,
        Err(e) => {
            error!(ip = %ip, error = %e, "Rate limit check failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
