// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::infrastructure::cache::fetch_cache::FetchError;
use crate::infrastructure::cache::kv_store::StoreError;
use crate::queue::async_queue::QueueError;

/// 机器人错误类型
///
/// 处理器与分发器中的失败，不包括“未知指令”和限流，这两者以结构化结果返回
#[derive(Error, Debug)]
pub enum BotError {
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("上游数据错误: {0}")]
    Fetch(#[from] FetchError),

    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),

    /// 协议适配器发送失败
    #[error("回复失败: {0}")]
    Reply(String),

    #[error("无效参数: {0}")]
    InvalidParameter(String),
}
