// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::bots::protocol::{CommandHandler, HandlerContext, Link, SendResult};
use crate::utils::errors::BotError;

pub const TOOLBOX_URL: &str = "https://teeworlds.cn/ddnet";

const HELP_LINES: [&str; 6] = [
    "目前豆豆可以提供以下查询功能：",
    "  /分数 <玩家名> - 查询分数",
    "  /地图 <地图名> - 查询地图",
    "  /绑定 <玩家名> - 绑定玩家名",
    "  /工具箱 - DDNet 工具箱",
    "更多功能请使用工具箱",
];

/// 帮助信息
pub struct HelpHandler;

impl HelpHandler {
    pub async fn reply(ctx: &HandlerContext) -> Result<SendResult, BotError> {
        ctx.reply
            .text_link(
                &HELP_LINES.join("\n"),
                &Link::new("🔗 DDNet 工具箱", "→ ", TOOLBOX_URL),
            )
            .await
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        Self::reply(ctx).await
    }
}
