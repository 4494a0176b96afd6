// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::bots::protocol::{Link, Reply, SendResult};
use crate::utils::errors::BotError;

/// 网页与命令行平台的回复适配器
///
/// 回复渲染为 Markdown，结果即 HTTP 响应体 `{"content": "..."}`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebReply {
    /// 是否渲染图片
    images: bool,
}

impl WebReply {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命令行客户端可以显示图片链接
    pub fn with_images() -> Self {
        Self { images: true }
    }

    fn content(content: String) -> SendResult {
        SendResult::Sent(json!({ "content": content }))
    }
}

fn markdown_link(link: &Link) -> String {
    format!("[{}]({})", link.label, link.url)
}

#[async_trait]
impl Reply for WebReply {
    async fn text(&self, msg: &str) -> Result<SendResult, BotError> {
        Ok(Self::content(msg.to_string()))
    }

    async fn link(&self, link: &Link) -> Result<SendResult, BotError> {
        Ok(Self::content(markdown_link(link)))
    }

    async fn text_link(&self, msg: &str, link: &Link) -> Result<SendResult, BotError> {
        Ok(Self::content(format!("{}\n\n{}", msg, markdown_link(link))))
    }

    async fn image_text_link(
        &self,
        msg: &str,
        image: Option<&str>,
        link: &Link,
    ) -> Result<SendResult, BotError> {
        match image {
            Some(url) if self.images => Ok(Self::content(format!(
                "{}\n\n![image]({})\n\n{}",
                msg,
                url,
                markdown_link(link)
            ))),
            _ => self.text_link(msg, link).await,
        }
    }

    async fn custom(&self, body: &Value) -> Result<SendResult, BotError> {
        Ok(SendResult::Sent(body.clone()))
    }
}
