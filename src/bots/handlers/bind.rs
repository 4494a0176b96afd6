// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::bots::protocol::{CommandHandler, HandlerContext, Link, SendResult};
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::BotError;

/// 游戏名最长字符数
const MAX_BIND_NAME: usize = 16;

/// 绑定或解绑游戏名
pub struct BindHandler {
    users: Arc<dyn UserRepository>,
}

impl BindHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CommandHandler for BindHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        let name: String = ctx.args.trim().chars().take(MAX_BIND_NAME).collect();
        let mut user = ctx.user.clone().unwrap_or_default();

        if name.is_empty() {
            if let Some(previous) = user.bind_name.take() {
                self.users.save(&ctx.uid, &user).await?;
                info!(uid = %ctx.uid, "Unbound game name");
                return ctx.reply.text(&format!("已解绑 {}", previous)).await;
            }

            return ctx
                .reply
                .text_link(
                    "绑定名字请提供 <玩家名>。或者直接使用 DDNet 工具箱",
                    &Link::new("🔗 排名查询工具", "→ ", "https://teeworlds.cn/goto#p"),
                )
                .await;
        }

        user.bind_name = Some(name.clone());
        self.users.save(&ctx.uid, &user).await?;
        info!(uid = %ctx.uid, name = %name, "Bound game name");

        ctx.reply
            .text(&format!(
                "已记住了你的游戏名 {}，之后的查询会默认使用这个名字。",
                name
            ))
            .await
    }
}
