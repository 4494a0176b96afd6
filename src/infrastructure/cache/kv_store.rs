// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// 键值存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 序列化或反序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 键值存储接口
///
/// 所有值以字符串形式保存，类型化访问见 [`KvStoreExt`]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 获取键对应的原始字符串，不存在或已过期时返回 `None`
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 写入键值对
    ///
    /// # 参数
    ///
    /// * `key` - 键
    /// * `value` - 值
    /// * `ttl` - 过期时间，`None` 表示永久保存
    async fn set_raw(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), StoreError>;

    /// 删除键
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// 类型化的键值访问
///
/// JSON 序列化统一在这里完成，调用方只处理具体类型
#[async_trait]
pub trait KvStoreExt: KvStore {
    async fn get<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send,
    {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<(), StoreError>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, raw, ttl).await
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
