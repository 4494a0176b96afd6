// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::bots::dispatcher::InboundMessage;
use crate::bots::protocol::{ChatMode, SendResult};
use crate::bots::web_reply::WebReply;
use crate::presentation::errors::AppError;
use crate::presentation::routes::AppState;
use crate::utils::errors::BotError;

/// 网页端群聊模式使用的群组标识
const WEBSITE_GROUP: &str = "WEBSITE";
const LOCAL_USER: &str = "LOCAL";

/// `/bots` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct BotQuery {
    pub mode: Option<String>,
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "Not Found",
    )
        .into_response()
}

fn parse_body(body: &Bytes) -> Result<Value, BotError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| BotError::InvalidParameter(e.to_string()))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// 没有任何回复时响应 `<No Response>`
fn chat_response(result: SendResult) -> Response {
    match result {
        SendResult::Sent(body) => Json(body).into_response(),
        SendResult::Ignored { message, .. } => {
            debug!(reason = %message, "Chat produced no reply");
            Json(json!({ "content": "<No Response>" })).into_response()
        }
    }
}

fn inbound(
    platform: &str,
    user: String,
    body: Value,
    mode: ChatMode,
    group: &str,
) -> Result<InboundMessage, BotError> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| BotError::InvalidParameter("message is required".to_string()))?
        .to_string();

    Ok(InboundMessage {
        platform: platform.to_string(),
        user,
        group: group.to_string(),
        message,
        mode,
        raw: body,
    })
}

/// 网页聊天入口
///
/// 携带 `mode` 参数时为管理操作，需要 `Authorization: Bearer <admin_token>`，
/// 未配置令牌或令牌不匹配时一律返回 404
pub async fn web_chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(query): Query<BotQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if query.mode.is_some() {
        let authorized = state
            .admin_token
            .as_deref()
            .is_some_and(|token| bearer(&headers) == Some(token));
        if !authorized {
            return Ok(not_found());
        }
    }

    let body = parse_body(&body)?;
    let dispatcher = &state.dispatcher;

    let (mode, group) = match query.mode.as_deref() {
        Some("custom") => {
            info!("Registering custom reply");
            let registration = dispatcher.register_custom(Some(body)).await?;
            return Ok(Json(registration).into_response());
        }
        Some("error") => {
            let result = dispatcher.custom_error().await?;
            return Ok(Json(result).into_response());
        }
        Some("last") => {
            let transaction = dispatcher.last_transaction().await?;
            return Ok(Json(transaction).into_response());
        }
        Some("user") => {
            let user = body.as_str().map(str::to_string);
            dispatcher.set_listen_to_user(user).await?;
            return Ok(Json(json!({ "user": body })).into_response());
        }
        Some("getuser") => {
            let user = dispatcher.listen_to_user().await?;
            return Ok(Json(json!({ "user": user })).into_response());
        }
        Some("group") => (ChatMode::Group, WEBSITE_GROUP),
        _ => (ChatMode::Direct, ""),
    };

    let message = inbound("web", addr.ip().to_string(), body, mode, group)?;
    let result = dispatcher.handle(message, Arc::new(WebReply::new())).await?;
    Ok(chat_response(result))
}

/// 本机命令行入口，仅接受回环地址
pub async fn local_chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<Response, AppError> {
    if !addr.ip().is_loopback() {
        debug!(peer = %addr, "Rejected non-local bot request");
        return Ok(not_found());
    }

    let body = parse_body(&body)?;
    let message = inbound("cli", LOCAL_USER.to_string(), body, ChatMode::Direct, "")?;
    let result = state
        .dispatcher
        .handle(message, Arc::new(WebReply::with_images()))
        .await?;
    Ok(chat_response(result))
}
