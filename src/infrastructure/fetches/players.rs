// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::player::{Player, PlayerLookup};
use crate::infrastructure::cache::fetch_cache::{FetchCache, FetchError, Fetched, FetchOptions};
use crate::infrastructure::cache::kv_store::KvStore;

/// 玩家数据来源
#[async_trait]
pub trait PlayerSource: Send + Sync {
    async fn lookup(&self, name: &str) -> PlayerLookup;
}

/// 基于 DDNet 排名列表的玩家数据
///
/// 查询只读缓存，缓存由 [`RankedPlayers::refresh`] 在后台更新
pub struct RankedPlayers {
    cache: FetchCache<Vec<Player>>,
}

impl RankedPlayers {
    pub fn new(
        url: &str,
        store: Arc<dyn KvStore>,
        options: FetchOptions,
        client: reqwest::Client,
    ) -> Self {
        Self {
            cache: FetchCache::json(url, store, options).with_client(client),
        }
    }

    /// 向上游检查更新
    pub async fn refresh(&self) -> Result<Fetched<Vec<Player>>, FetchError> {
        self.cache.fetch(false).await
    }
}

#[async_trait]
impl PlayerSource for RankedPlayers {
    async fn lookup(&self, name: &str) -> PlayerLookup {
        match self.cache.fetch(true).await {
            Ok(fetched) => fetched
                .result
                .into_iter()
                .find(|player| player.name == name)
                .map(PlayerLookup::Found)
                .unwrap_or(PlayerLookup::NotFound),
            Err(e) => {
                warn!(error = %e, "Player ranks unavailable");
                PlayerLookup::Unavailable
            }
        }
    }
}
