// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::models::permission::Permission;
use crate::domain::models::user::UserRecord;
use crate::utils::errors::BotError;

/// 聊天模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatMode {
    /// 群聊
    Group,
    /// 私聊
    Direct,
}

/// 回复中附带的链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    /// 纯文本平台中链接前的提示文字
    pub prefix: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, prefix: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prefix: prefix.into(),
            url: url.into(),
        }
    }
}

/// 发送结果
///
/// `Ignored` 表示什么都没有发生，与真正的错误区分开
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendResult {
    Ignored { ignored: bool, message: String },
    Sent(Value),
}

impl SendResult {
    pub fn ignored(message: impl Into<String>) -> Self {
        SendResult::Ignored {
            ignored: true,
            message: message.into(),
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, SendResult::Ignored { ignored: true, .. })
    }
}

/// 协议回复适配器
///
/// 各平台（QQ、微信、网页、命令行）各自实现，分发器不关心具体载荷
#[async_trait]
pub trait Reply: Send + Sync {
    async fn text(&self, msg: &str) -> Result<SendResult, BotError>;

    async fn link(&self, link: &Link) -> Result<SendResult, BotError>;

    async fn text_link(&self, msg: &str, link: &Link) -> Result<SendResult, BotError>;

    /// 带图片的回复，不支持图片的平台退化为 `text_link`
    async fn image_text_link(
        &self,
        msg: &str,
        _image: Option<&str>,
        link: &Link,
    ) -> Result<SendResult, BotError> {
        self.text_link(msg, link).await
    }

    async fn custom(&self, body: &Value) -> Result<SendResult, BotError>;
}

/// 处理器上下文
#[derive(Clone)]
pub struct HandlerContext {
    /// `platform:user`
    pub uid: String,
    pub user: Option<UserRecord>,
    pub reply: Arc<dyn Reply>,
    pub command: String,
    pub args: String,
    pub mode: ChatMode,
    /// 群组标识，私聊为空串
    pub group: String,
}

impl HandlerContext {
    pub fn permissions(&self) -> &[Permission] {
        self.user
            .as_ref()
            .map(|user| user.permissions.as_slice())
            .unwrap_or_default()
    }
}

/// 指令处理器
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError>;
}
