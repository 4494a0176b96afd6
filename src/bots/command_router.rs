// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::bots::protocol::{CommandHandler, HandlerContext, SendResult};
use crate::domain::models::permission::Permission;
use crate::utils::errors::BotError;

/// 解析后的指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// 未注册或无权限时为真，交给兜底处理器
    pub fallback: bool,
    pub cmd: String,
    pub args: String,
}

struct Route {
    handler: Arc<dyn CommandHandler>,
    /// `None` 对所有人开放，空列表仅限 `SUPER`
    permissions: Option<Vec<Permission>>,
}

/// 指令路由
///
/// 启动时构建，之后只读
#[derive(Default)]
pub struct CommandRouter {
    commands: HashMap<String, Route>,
    fallback: Option<Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册对所有人开放的指令
    pub fn add(self, command: &str, handler: Arc<dyn CommandHandler>) -> Self {
        self.register(command, handler, None)
    }

    /// 注册需要权限的指令
    ///
    /// # 参数
    ///
    /// * `command` - 指令名
    /// * `handler` - 处理器
    /// * `permissions` - 拥有其中任意一项即可执行，空列表表示仅 `SUPER` 可执行
    pub fn add_with_permissions(
        self,
        command: &str,
        handler: Arc<dyn CommandHandler>,
        permissions: Vec<Permission>,
    ) -> Self {
        self.register(command, handler, Some(permissions))
    }

    fn register(
        mut self,
        command: &str,
        handler: Arc<dyn CommandHandler>,
        permissions: Option<Vec<Permission>>,
    ) -> Self {
        self.commands.insert(
            command.to_string(),
            Route {
                handler,
                permissions,
            },
        );
        self
    }

    /// 注册兜底处理器
    pub fn fallback(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// 解析消息
    ///
    /// 去掉开头的 `/` 或 `/ `，按第一个空白切分指令与参数
    pub fn parse(&self, msg: &str, permissions: &[Permission]) -> ParsedCommand {
        let msg = msg.trim();
        let msg = msg
            .strip_prefix("/ ")
            .or_else(|| msg.strip_prefix('/'))
            .unwrap_or(msg);

        let (cmd, args) = match msg.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (msg, ""),
        };

        let allowed = self
            .commands
            .get(cmd)
            .is_some_and(|route| Self::is_allowed(route, permissions));

        ParsedCommand {
            fallback: !allowed,
            cmd: cmd.to_string(),
            args: args.to_string(),
        }
    }

    fn is_allowed(route: &Route, permissions: &[Permission]) -> bool {
        if permissions.contains(&Permission::Super) {
            return true;
        }
        match &route.permissions {
            None => true,
            Some(required) => permissions.iter().any(|held| required.contains(held)),
        }
    }

    /// 执行指令
    ///
    /// 没有兜底处理器时，未知指令返回 `{ignored: true}`
    pub async fn run(
        &self,
        command: &ParsedCommand,
        ctx: &HandlerContext,
    ) -> Result<SendResult, BotError> {
        let handler = if command.fallback {
            self.fallback.as_ref()
        } else {
            self.commands.get(&command.cmd).map(|route| &route.handler)
        };

        match handler {
            Some(handler) => handler.handle(ctx).await,
            None => {
                debug!(cmd = %command.cmd, "No handler for command");
                Ok(SendResult::ignored("Unknown command"))
            }
        }
    }
}
