// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::infrastructure::cache::fetch_cache::FetchedView;
use crate::presentation::routes::AppState;

/// 地图列表
///
/// 直接返回缓存中的 JSON 字符串，`x-cache` 标明是否命中缓存
pub async fn maps(State(state): State<AppState>) -> Response {
    let fetched = match state.maps.fetch_as_string(false, false).await {
        Ok(FetchedView::Raw(fetched)) => fetched,
        Ok(FetchedView::Typed(_)) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!(error = %e, "Map list unavailable");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, "public, max-age=600"),
            (x_cache(), cache_label(fetched.hit)),
        ],
        fetched.result,
    )
        .into_response()
}

/// 服务器列表
///
/// 原样返回主服务器的 `servers.json`，上游不可用且没有缓存时返回 500
pub async fn servers(State(state): State<AppState>) -> Response {
    let fetched = match state.servers.fetch(false).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(error = %e, "Server list unavailable");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "public, max-age=10"),
            (x_cache(), cache_label(fetched.hit)),
        ],
        fetched.result,
    )
        .into_response()
}

fn x_cache() -> header::HeaderName {
    header::HeaderName::from_static("x-cache")
}

fn cache_label(hit: bool) -> &'static str {
    if hit {
        "HIT"
    } else {
        "MISS"
    }
}
