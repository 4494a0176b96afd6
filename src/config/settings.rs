// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::services::rate_limiting_service::RateLimitConfig;
use crate::infrastructure::cache::fetch_cache::FetchOptions;

/// 应用程序配置设置
///
/// 包含服务器、Redis、上游数据、机器人、网页限流和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 上游抓取缓存配置
    pub fetch: FetchSettings,
    /// DDNet 数据源
    pub ddnet: DdnetSettings,
    /// 聊天机器人配置
    pub bot: BotSettings,
    /// 网页端配置
    pub web: WebSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// Redis配置设置
///
/// 未配置 `url` 时使用进程内存储
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: Option<String>,
}

/// 抓取缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 两次上游检查的最小间隔（秒）
    pub min_query_interval_secs: u64,
    /// 跳过 HEAD 检查直接 GET
    pub skip_head: bool,
    /// 每次都向上游请求
    pub always_fetch: bool,
}

impl FetchSettings {
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            min_query_interval: Duration::from_secs(self.min_query_interval_secs),
            skip_head: self.skip_head,
            always_fetch: self.always_fetch,
        }
    }
}

/// DDNet 上游地址
#[derive(Debug, Clone, Deserialize)]
pub struct DdnetSettings {
    pub maps_url: String,
    pub players_url: String,
    /// 主服务器列表地址
    pub servers_url: String,
    /// 后台刷新玩家排名的间隔（秒）
    pub players_refresh_secs: u64,
}

/// 机器人配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BotSettings {
    /// 管理接口的 Bearer 令牌，未配置时管理模式不可用
    pub admin_token: Option<String>,
    /// 子队列数量
    pub queue_workers: usize,
    /// 按用户的聊天限流
    pub rate_limit: RateLimitConfig,
}

/// 网页端配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WebSettings {
    /// 按 IP 的网页机器人限流
    pub rate_limit: RateLimitConfig,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("DDPORTAL").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // FetchCache
            .set_default("fetch.min_query_interval_secs", 60)?
            .set_default("fetch.skip_head", false)?
            .set_default("fetch.always_fetch", false)?
            // Upstreams
            .set_default("ddnet.maps_url", "https://ddnet.org/releases/maps.json")?
            .set_default("ddnet.players_url", "https://ddnet.org/players/ranks.json")?
            .set_default(
                "ddnet.servers_url",
                "https://master1.ddnet.org/ddnet/15/servers.json",
            )?
            .set_default("ddnet.players_refresh_secs", 300)?
            // Bot
            .set_default("bot.queue_workers", 1)?
            .set_default("bot.rate_limit.threshold", 5)?
            .set_default("bot.rate_limit.interval", 10)?
            .set_default("bot.rate_limit.cooldown", 30)?
            // Web
            .set_default("web.rate_limit.threshold", 30)?
            .set_default("web.rate_limit.interval", 6)?
            .set_default("web.rate_limit.cooldown", 12)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.addr", "0.0.0.0:9000")
    }

    /// 仅使用默认值构建配置，不读取文件与环境变量
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    /// HTTP 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
