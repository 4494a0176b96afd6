// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::bots::arg_parser::ArgParser;
use crate::bots::protocol::{CommandHandler, HandlerContext, SendResult};
use crate::domain::models::permission::Permission;
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::BotError;

/// `perm-add <uid> <permission>`
pub struct PermissionAddHandler {
    users: Arc<dyn UserRepository>,
}

impl PermissionAddHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CommandHandler for PermissionAddHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        let parser = ArgParser::new(&ctx.args);
        let (Some(uid), Some(name)) = (parser.get_string(0), parser.get_string(1)) else {
            return ctx.reply.text("/perm-add <uid> <permission>").await;
        };

        let Ok(permission) = name.parse::<Permission>() else {
            return ctx
                .reply
                .text(&format!("Unknown permission \"{}\"", name))
                .await;
        };

        let mut user = self.users.find(&uid).await?.unwrap_or_default();
        if !user.permissions.contains(&permission) {
            user.permissions.push(permission);
        }
        self.users.save(&uid, &user).await?;
        info!(target_uid = %uid, %permission, by = %ctx.uid, "Permission granted");

        ctx.reply
            .text(&format!(
                "Permission \"{}\" has been given to \"{}\"",
                permission, uid
            ))
            .await
    }
}

/// `perm-rm <uid> <permission | all>`
pub struct PermissionRemoveHandler {
    users: Arc<dyn UserRepository>,
}

impl PermissionRemoveHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CommandHandler for PermissionRemoveHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        let parser = ArgParser::new(&ctx.args);
        let (Some(uid), Some(name)) = (parser.get_string(0), parser.get_string(1)) else {
            return ctx.reply.text("/perm-rm <uid> <permission | all>").await;
        };

        let Some(mut user) = self.users.find(&uid).await? else {
            return ctx
                .reply
                .text(&format!("User \"{}\" does not exist", uid))
                .await;
        };

        if name == "all" {
            user.permissions.clear();
            self.users.save(&uid, &user).await?;
            info!(target_uid = %uid, by = %ctx.uid, "All permissions revoked");
            return ctx
                .reply
                .text(&format!("All permissions have been removed from \"{}\"", uid))
                .await;
        }

        let Ok(permission) = name.parse::<Permission>() else {
            return ctx
                .reply
                .text(&format!("Unknown permission \"{}\"", name))
                .await;
        };

        user.permissions.retain(|held| *held != permission);
        self.users.save(&uid, &user).await?;
        info!(target_uid = %uid, %permission, by = %ctx.uid, "Permission revoked");

        ctx.reply
            .text(&format!(
                "Permission \"{}\" has been removed from \"{}\"",
                permission, uid
            ))
            .await
    }
}

/// `perm [uid]`，默认查看自己
pub struct PermissionCheckHandler {
    users: Arc<dyn UserRepository>,
}

impl PermissionCheckHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CommandHandler for PermissionCheckHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        let target = ArgParser::new(&ctx.args)
            .get_rest(0)
            .unwrap_or_else(|| ctx.uid.clone());

        let Some(user) = self.users.find(&target).await? else {
            return ctx
                .reply
                .text(&format!("User \"{}\" does not exist", target))
                .await;
        };

        if user.permissions.is_empty() {
            return ctx
                .reply
                .text(&format!("User \"{}\" has no permission.", target))
                .await;
        }

        let list = user
            .permissions
            .iter()
            .map(Permission::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        ctx.reply
            .text(&format!("User \"{}\" has permission {}", target, list))
            .await
    }
}
