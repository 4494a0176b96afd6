// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::domain::models::map::MapInfo;
use crate::infrastructure::cache::fetch_cache::{FetchCache, FetchError, FetchOptions};
use crate::infrastructure::cache::kv_store::KvStore;

pub type MapCache = FetchCache<Vec<MapInfo>>;

/// 创建 DDNet 地图列表缓存
///
/// 上游的 `website` 等多余字段在反序列化时丢弃
pub fn map_cache(
    url: &str,
    store: Arc<dyn KvStore>,
    options: FetchOptions,
    client: reqwest::Client,
) -> MapCache {
    FetchCache::new(
        url,
        store,
        |response: reqwest::Response| async move {
            let maps = response
                .json::<Vec<MapInfo>>()
                .await
                .map_err(|e| FetchError::Transform(e.to_string()))?;
            info!(count = maps.len(), "Map list refreshed");
            Ok(maps)
        },
        options,
    )
    .with_client(client)
}
