// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::infrastructure::cache::kv_store::{KvStore, KvStoreExt, StoreError};

const RATE_LIMITER_PREFIX: &str = "rl";

/// 限流配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// 每个窗口内允许的次数
    pub threshold: usize,
    /// 窗口长度（秒）
    pub interval: u64,
    /// 触发后的冷却时间（秒）
    pub cooldown: u64,
}

/// 限流记录
///
/// `cd` 生效期间不再统计窗口
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RateLimitInfo {
    /// 冷却开始时间（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cd: Option<i64>,
    /// 窗口内的操作时间戳（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ts: Option<Vec<i64>>,
}

/// 限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitDecision {
    /// 本次调用刚刚触发限流
    pub triggered: bool,
    /// 当前处于限流状态
    pub limited: bool,
}

/// 滑动窗口加冷却的限流器
///
/// 按 (prefix, group, user) 计数，记录保存在键值存储中
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
    prefix: String,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// 创建新的限流器
    ///
    /// # 参数
    ///
    /// * `store` - 保存限流记录的键值存储
    /// * `prefix` - 区分不同用途的键前缀
    /// * `config` - 阈值、窗口与冷却时间
    pub fn new(store: Arc<dyn KvStore>, prefix: impl Into<String>, config: RateLimitConfig) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            config,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    fn key(&self, user: &str, group: &str) -> String {
        format!("{}:{}:{}:{}", RATE_LIMITER_PREFIX, self.prefix, group, user)
    }

    /// 检查并记录一次操作
    ///
    /// # 参数
    ///
    /// * `user` - 用户标识
    /// * `group` - 群组标识，私聊为空串
    ///
    /// # 返回值
    ///
    /// * `Ok(RateLimitDecision)` - `limited` 决定是否拦截，`triggered` 仅在刚触发时为真
    /// * `Err(StoreError)` - 存储访问失败
    pub async fn is_limited(&self, user: &str, group: &str) -> Result<RateLimitDecision, StoreError> {
        self.is_limited_at(user, group, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// 以指定时间（毫秒）检查
    pub async fn is_limited_at(
        &self,
        user: &str,
        group: &str,
        now: i64,
    ) -> Result<RateLimitDecision, StoreError> {
        let key = self.key(user, group);
        let interval_ms = (self.config.interval * 1000) as i64;
        let cooldown_ms = (self.config.cooldown * 1000) as i64;
        let interval_ttl = Some(Duration::from_secs(self.config.interval));
        let record = self.store.get::<RateLimitInfo>(&key).await?;

        if let Some(cd) = record.as_ref().and_then(|info| info.cd) {
            if now - cd < cooldown_ms {
                return Ok(RateLimitDecision {
                    triggered: false,
                    limited: true,
                });
            }
        }

        let Some(record) = record else {
            let info = RateLimitInfo {
                cd: None,
                ts: Some(vec![now]),
            };
            self.store.set(&key, &info, interval_ttl).await?;
            return Ok(RateLimitDecision::default());
        };

        let mut within: Vec<i64> = record
            .ts
            .unwrap_or_default()
            .into_iter()
            .filter(|ts| now - ts < interval_ms)
            .collect();

        if within.len() >= self.config.threshold {
            let info = RateLimitInfo {
                cd: Some(now),
                ts: None,
            };
            self.store
                .set(&key, &info, Some(Duration::from_secs(self.config.cooldown)))
                .await?;
            debug!(key = %key, "Rate limit triggered");
            return Ok(RateLimitDecision {
                triggered: true,
                limited: true,
            });
        }

        within.push(now);
        let info = RateLimitInfo {
            cd: None,
            ts: Some(within),
        };
        self.store.set(&key, &info, interval_ttl).await?;
        Ok(RateLimitDecision::default())
    }
}

#[cfg(test)]
#[path = "rate_limiting_service_test.rs"]
mod tests;
