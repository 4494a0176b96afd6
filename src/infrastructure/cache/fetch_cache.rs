// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, ETAG, LAST_MODIFIED};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::infrastructure::cache::kv_store::{KvStore, KvStoreExt};

/// 上游缓存错误类型
///
/// 同一轮请求的结果需要分发给所有合并的等待者，因此错误只携带字符串
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// 上游请求失败（网络错误或非成功状态码）
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// 响应转换失败
    #[error("Transform failed: {0}")]
    Transform(String),

    /// 键值存储错误
    #[error("Cache store error: {0}")]
    Store(String),

    /// 序列化或反序列化失败
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 领头请求在完成之前被丢弃
    #[error("Fetch cycle was abandoned before completion")]
    Abandoned,
}

/// 缓存选项
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// 两次上游检查之间的最短间隔
    pub min_query_interval: Duration,
    /// 跳过 HEAD 预检，总是直接 GET
    pub skip_head: bool,
    /// 总是从上游重新获取并转换，调试用
    pub always_fetch: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            min_query_interval: Duration::from_secs(60),
            skip_head: false,
            always_fetch: false,
        }
    }
}

/// 持久化到键值存储中的缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    tag: String,
    data: String,
}

/// 一次获取的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub result: T,
    /// 结果是否来自缓存
    pub hit: bool,
}

/// `fetch_as_string` 的返回值
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedView<T> {
    /// 序列化后的字符串
    Raw(Fetched<String>),
    /// 类型化的对象
    Typed(Fetched<T>),
}

impl<T> FetchedView<T> {
    pub fn hit(&self) -> bool {
        match self {
            FetchedView::Raw(fetched) => fetched.hit,
            FetchedView::Typed(fetched) => fetched.hit,
        }
    }
}

/// 一轮请求的内部结果，新获取的数据同时保留对象和字符串
#[derive(Debug, Clone)]
struct Snapshot<T> {
    data: String,
    value: Option<T>,
    hit: bool,
}

impl<T> Snapshot<T> {
    fn cached(entry: CacheEntry) -> Self {
        Self {
            data: entry.data,
            value: None,
            hit: true,
        }
    }
}

type Transformer<T> =
    Box<dyn Fn(reqwest::Response) -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

type Waiter<T> = oneshot::Sender<Result<Snapshot<T>, FetchError>>;

/// 清理进行中标记
///
/// 领头请求被丢弃时，等待者的发送端随之丢弃，等待者收到 `Abandoned`
///
/// `finish` 之后守卫不再持有标记，析构时不会清掉下一轮领头请求的等待者
struct InflightGuard<'a, T> {
    callbacks: Option<&'a Mutex<Option<Vec<Waiter<T>>>>>,
}

impl<T> InflightGuard<'_, T> {
    fn finish(mut self) -> Vec<Waiter<T>> {
        match self.callbacks.take() {
            Some(callbacks) => callbacks.lock().take().unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

impl<T> Drop for InflightGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(callbacks) = self.callbacks.take() {
            callbacks.lock().take();
        }
    }
}

/// 上游资源缓存
///
/// 包装一个上游 URL，合并并发请求，通过 HEAD 预检和 ETag/Last-Modified
/// 进行条件重新验证。同一实例同一时间最多只有一轮上游请求在进行
pub struct FetchCache<T> {
    url: String,
    key: String,
    client: reqwest::Client,
    store: Arc<dyn KvStore>,
    transformer: Transformer<T>,
    /// `None` 表示不限流
    min_query_interval: Option<Duration>,
    skip_head: bool,
    always_fetch: bool,
    next_query_time: Mutex<Option<Instant>>,
    callbacks: Mutex<Option<Vec<Waiter<T>>>>,
}

impl<T> FetchCache<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// 使用自定义转换器创建缓存
    ///
    /// # 参数
    ///
    /// * `url` - 上游地址
    /// * `store` - 保存缓存条目的键值存储
    /// * `transformer` - 将上游响应转换为目标类型
    /// * `options` - 缓存选项，`always_fetch` 会同时开启 `skip_head` 并关闭限流
    pub fn new<F, Fut>(
        url: impl Into<String>,
        store: Arc<dyn KvStore>,
        transformer: F,
        options: FetchOptions,
    ) -> Self
    where
        F: Fn(reqwest::Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let url = url.into();
        let key = format!("cache:{}", url);
        let (min_query_interval, skip_head) = if options.always_fetch {
            (None, true)
        } else {
            (Some(options.min_query_interval), options.skip_head)
        };

        Self {
            url,
            key,
            client: reqwest::Client::new(),
            store,
            transformer: Box::new(
                move |response| -> BoxFuture<'static, Result<T, FetchError>> {
                    Box::pin(transformer(response))
                },
            ),
            min_query_interval,
            skip_head,
            always_fetch: options.always_fetch,
            next_query_time: Mutex::new(None),
            callbacks: Mutex::new(None),
        }
    }

    /// 以 JSON 方式解析响应体
    pub fn json(url: impl Into<String>, store: Arc<dyn KvStore>, options: FetchOptions) -> Self {
        Self::new(
            url,
            store,
            |response: reqwest::Response| async move {
                response
                    .json::<T>()
                    .await
                    .map_err(|e| FetchError::Transform(e.to_string()))
            },
            options,
        )
    }

    /// 使用共享的 HTTP 客户端
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 获取类型化结果
    ///
    /// # 参数
    ///
    /// * `use_cache_if_possible` - 存在缓存时直接返回，不做任何上游检查
    ///
    /// # 返回值
    ///
    /// * `Ok(Fetched<T>)` - 结果及是否命中缓存
    /// * `Err(FetchError)` - 无缓存且上游失败，或转换失败
    pub async fn fetch(&self, use_cache_if_possible: bool) -> Result<Fetched<T>, FetchError> {
        let snapshot = self.run_coalesced(use_cache_if_possible).await?;
        let result = match snapshot.value {
            Some(value) => value,
            None => serde_json::from_str(&snapshot.data)
                .map_err(|e| FetchError::Serialization(e.to_string()))?,
        };

        Ok(Fetched {
            result,
            hit: snapshot.hit,
        })
    }

    /// 获取序列化后的字符串视图
    ///
    /// 缓存中的数据已经是字符串形式，适合直接作为 HTTP 响应体返回。
    /// `keep_typed` 为真且本轮刚从上游获取时，返回类型化对象以避免重复解析
    pub async fn fetch_as_string(
        &self,
        use_cache_if_possible: bool,
        keep_typed: bool,
    ) -> Result<FetchedView<T>, FetchError> {
        let snapshot = self.run_coalesced(use_cache_if_possible).await?;
        match snapshot.value {
            Some(value) if keep_typed => Ok(FetchedView::Typed(Fetched {
                result: value,
                hit: snapshot.hit,
            })),
            _ => Ok(FetchedView::Raw(Fetched {
                result: snapshot.data,
                hit: snapshot.hit,
            })),
        }
    }

    /// 合并并发请求，同一时间只有一个调用者真正执行
    async fn run_coalesced(&self, use_cache: bool) -> Result<Snapshot<T>, FetchError> {
        let receiver = {
            let mut callbacks = self.callbacks.lock();
            match callbacks.as_mut() {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    *callbacks = Some(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = receiver {
            debug!(url = %self.url, "Joined in-flight fetch");
            return rx.await.unwrap_or(Err(FetchError::Abandoned));
        }

        let guard = InflightGuard {
            callbacks: Some(&self.callbacks),
        };
        let outcome = self.cycle(use_cache).await;
        let waiters = guard.finish();

        let outcome_label = match &outcome {
            Ok(snapshot) if snapshot.hit => "hit",
            Ok(_) => "miss",
            Err(_) => "error",
        };
        metrics::counter!("fetch_cache_requests_total", "outcome" => outcome_label)
            .increment(1 + waiters.len() as u64);

        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
        outcome
    }

    /// 单轮获取与验证
    async fn cycle(&self, use_cache: bool) -> Result<Snapshot<T>, FetchError> {
        let cache = self.read_entry().await;

        if use_cache {
            if let Some(entry) = cache {
                return Ok(Snapshot::cached(entry));
            }
        }

        let now = Instant::now();
        if let Some(entry) = &cache {
            let next_query_time = *self.next_query_time.lock();
            if next_query_time.is_some_and(|next| now < next) {
                debug!(url = %self.url, "Throttled, serving cache");
                return Ok(Snapshot::cached(entry.clone()));
            }
        }

        if let Some(interval) = self.min_query_interval {
            *self.next_query_time.lock() = Some(now + interval);
        }

        let outdated = match &cache {
            None => true,
            Some(_) if self.skip_head => true,
            Some(entry) => self.check_outdated(&entry.tag).await,
        };

        if outdated {
            match self.fetch_fresh(cache.as_ref()).await {
                Ok(Some(snapshot)) => return Ok(snapshot),
                Ok(None) => {}
                Err(FetchError::Upstream(reason)) if cache.is_some() => {
                    warn!(url = %self.url, %reason, "Upstream failed, serving stale cache");
                }
                Err(FetchError::Upstream(reason)) => {
                    *self.next_query_time.lock() = None;
                    return Err(FetchError::Upstream(reason));
                }
                Err(other) => return Err(other),
            }
        }

        match cache {
            Some(entry) => Ok(Snapshot::cached(entry)),
            None => {
                *self.next_query_time.lock() = None;
                Err(FetchError::Upstream(format!(
                    "no data available for {}",
                    self.url
                )))
            }
        }
    }

    async fn read_entry(&self) -> Option<CacheEntry> {
        match self.store.get::<CacheEntry>(&self.key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    /// HEAD 预检，失败或缺少验证标签时视为未过期
    async fn check_outdated(&self, cached_tag: &str) -> bool {
        metrics::counter!("fetch_cache_upstream_requests_total", "method" => "HEAD").increment(1);
        match self.client.head(&self.url).send().await {
            Ok(response) if response.status().is_success() => match tag_of(response.headers()) {
                Some(tag) => tag != cached_tag,
                None => false,
            },
            Ok(response) => {
                warn!(url = %self.url, status = %response.status(), "HEAD check failed");
                false
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "HEAD check failed");
                false
            }
        }
    }

    /// GET 上游并转换
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(snapshot))` - 新获取的数据
    /// * `Ok(None)` - 验证标签与缓存一致，应继续使用缓存
    /// * `Err(FetchError)` - 上游或转换失败
    async fn fetch_fresh(
        &self,
        cache: Option<&CacheEntry>,
    ) -> Result<Option<Snapshot<T>>, FetchError> {
        metrics::counter!("fetch_cache_upstream_requests_total", "method" => "GET").increment(1);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Upstream(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let tag = tag_of(response.headers());
        if !self.always_fetch {
            if let (Some(tag), Some(entry)) = (&tag, cache) {
                if *tag == entry.tag {
                    // 丢弃响应即中断响应体读取
                    drop(response);
                    debug!(url = %self.url, "Tag unchanged, keeping cache");
                    return Ok(None);
                }
            }
        }

        let value = (self.transformer)(response).await?;
        let data =
            serde_json::to_string(&value).map_err(|e| FetchError::Serialization(e.to_string()))?;

        match tag {
            Some(tag) => {
                let entry = CacheEntry {
                    tag,
                    data: data.clone(),
                };
                if let Err(e) = self.store.set(&self.key, &entry, None).await {
                    warn!(key = %self.key, error = %e, "Failed to persist cache entry");
                } else {
                    info!(url = %self.url, tag = %entry.tag, "Cache updated");
                }
            }
            None => debug!(url = %self.url, "No validator, response not cached"),
        }

        Ok(Some(Snapshot {
            data,
            value: Some(value),
            hit: false,
        }))
    }
}

impl FetchCache<String> {
    /// 以纯文本方式读取响应体
    pub fn text(url: impl Into<String>, store: Arc<dyn KvStore>, options: FetchOptions) -> Self {
        Self::new(
            url,
            store,
            |response: reqwest::Response| async move {
                response
                    .text()
                    .await
                    .map_err(|e| FetchError::Transform(e.to_string()))
            },
            options,
        )
    }
}

/// 验证标签，优先使用 ETag
fn tag_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ETAG)
        .or_else(|| headers.get(LAST_MODIFIED))
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "fetch_cache_test.rs"]
mod tests;
