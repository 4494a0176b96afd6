// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::bots::handlers::help::TOOLBOX_URL;
use crate::bots::protocol::{CommandHandler, HandlerContext, Link, SendResult};
use crate::utils::errors::BotError;

pub struct ToolboxHandler;

#[async_trait]
impl CommandHandler for ToolboxHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        ctx.reply
            .link(&Link::new("🔗 DDNet 工具箱", "DDNet 工具箱 → ", TOOLBOX_URL))
            .await
    }
}

/// 显示调用者的 uid，用于管理员授权
pub struct ShowUidHandler;

#[async_trait]
impl CommandHandler for ShowUidHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        ctx.reply.text(&format!("您的 UID 是 {}", ctx.uid)).await
    }
}
