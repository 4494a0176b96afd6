// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use crate::infrastructure::cache::kv_store::{KvStore, StoreError};

/// Redis客户端
///
/// 提供对Redis数据库的异步操作接口，作为跨进程共享的键值存储
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(StoreError)` - URL 无法解析
    pub fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl KvStore for RedisClient {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.connection().await?;
        let value: Option<String> = con.get(key).await?;
        Ok(value)
    }

    /// 设置键值对，带过期时间时使用毫秒精度
    async fn set_raw(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        match ttl {
            // PSETEX 不接受 0
            Some(ttl) => {
                let millis = (ttl.as_millis() as u64).max(1);
                con.pset_ex::<_, _, ()>(key, value, millis).await?;
            }
            None => con.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        con.del::<_, ()>(key).await?;
        Ok(())
    }
}
