// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::cache::fetch_cache::{FetchCache, FetchOptions};
use crate::infrastructure::cache::kv_store::KvStore;

/// 服务器列表原文缓存
pub type ServerCache = FetchCache<String>;

/// 服务器列表变化频繁，上游检查间隔远短于其他数据
pub const SERVERS_MIN_QUERY_INTERVAL: Duration = Duration::from_secs(2);

/// 创建 DDNet 主服务器列表缓存
///
/// 主服务器不提供可靠的 HEAD 响应，因此总是直接 GET。
/// 响应体按原文保存，由 `/api/servers` 原样返回
///
/// # 参数
///
/// * `url` - 主服务器 `servers.json` 地址
/// * `store` - 键值存储
/// * `options` - 全局缓存选项，只沿用其中的 `always_fetch`
/// * `client` - 共享的 HTTP 客户端
pub fn server_cache(
    url: &str,
    store: Arc<dyn KvStore>,
    options: FetchOptions,
    client: reqwest::Client,
) -> ServerCache {
    let options = FetchOptions {
        min_query_interval: SERVERS_MIN_QUERY_INTERVAL,
        skip_head: true,
        always_fetch: options.always_fetch,
    };
    FetchCache::text(url, store, options).with_client(client)
}
