// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bots::protocol::{CommandHandler, HandlerContext, Link, SendResult};
use crate::domain::models::player::{PlayerLookup, RankEntry};
use crate::infrastructure::fetches::players::PlayerSource;
use crate::utils::errors::BotError;

/// 分数查询
///
/// 未提供玩家名时使用绑定的游戏名
pub struct PointsHandler {
    players: Arc<dyn PlayerSource>,
}

impl PointsHandler {
    pub fn new(players: Arc<dyn PlayerSource>) -> Self {
        Self { players }
    }
}

fn rank_line(name: &str, entry: &RankEntry, fallback: &str) -> String {
    match entry.rank {
        Some(rank) if rank > 0 => format!("{}: {}pts [No.{}]", name, entry.points, rank),
        _ => format!("{}: {}", name, fallback),
    }
}

#[async_trait]
impl CommandHandler for PointsHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        let mut name = ctx.args.trim().to_string();
        if name.is_empty() {
            name = ctx
                .user
                .as_ref()
                .and_then(|user| user.bind_name.clone())
                .unwrap_or_default();
        }

        if name.is_empty() {
            return ctx
                .reply
                .text_link(
                    "查分请提供 <玩家名>。或者使用 DDNet 工具箱",
                    &Link::new(
                        "🔗 排名查询工具",
                        "→ ",
                        "https://teeworlds.cn/ddnet/players",
                    ),
                )
                .await;
        }

        let player = match self.players.lookup(&name).await {
            PlayerLookup::Unavailable => {
                return Ok(SendResult::ignored("玩家信息未加载，分数功能未启用"));
            }
            PlayerLookup::NotFound => return ctx.reply.text("未找到相关的玩家信息").await,
            PlayerLookup::Found(player) => player,
        };

        let lines = [
            player.name.clone(),
            rank_line("总通过分", &player.points, "无记录"),
            rank_line("团队排位", &player.team, "未上榜"),
            rank_line("个人排位", &player.rank, "未上榜"),
            rank_line("去年获得", &player.yearly, "无记录"),
        ];

        ctx.reply
            .text_link(
                &lines.join("\n"),
                &Link::new(
                    "🔗 玩家详情",
                    "详情点击：",
                    format!(
                        "https://teeworlds.cn/ddnet/players/{}",
                        urlencoding::encode(&player.name)
                    ),
                ),
            )
            .await
    }
}
