// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::bots::handlers::help::HelpHandler;
use crate::bots::protocol::{ChatMode, CommandHandler, HandlerContext, SendResult};
use crate::utils::errors::BotError;

/// 未知指令：私聊回复帮助，群聊保持沉默
pub struct FallbackHandler;

#[async_trait]
impl CommandHandler for FallbackHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        match ctx.mode {
            ChatMode::Direct => HelpHandler::reply(ctx).await,
            ChatMode::Group => Ok(SendResult::ignored("未知指令")),
        }
    }
}
