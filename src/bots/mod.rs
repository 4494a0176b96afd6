// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 指令表的组装入口

use std::sync::Arc;

use crate::bots::command_router::CommandRouter;
use crate::bots::handlers::{
    admin::{PermissionAddHandler, PermissionCheckHandler, PermissionRemoveHandler},
    bind::BindHandler,
    fallback::FallbackHandler,
    help::HelpHandler,
    info::{ShowUidHandler, ToolboxHandler},
    maps::MapsHandler,
    points::PointsHandler,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::fetches::{maps::MapCache, players::PlayerSource};

pub mod arg_parser;
pub mod command_router;
pub mod dispatcher;
pub mod handlers;
pub mod protocol;
pub mod web_reply;

/// 构建指令表
///
/// # 参数
///
/// * `users` - 用户仓库，绑定与权限管理使用
/// * `maps` - 地图列表缓存
/// * `players` - 玩家数据来源
pub fn build_router(
    users: Arc<dyn UserRepository>,
    maps: Arc<MapCache>,
    players: Arc<dyn PlayerSource>,
) -> CommandRouter {
    let help = Arc::new(HelpHandler);
    let points = Arc::new(PointsHandler::new(players));
    let bind = Arc::new(BindHandler::new(users.clone()));
    let maps = Arc::new(MapsHandler::new(maps));

    CommandRouter::new()
        .add("__uid__", Arc::new(ShowUidHandler))
        .add("", help.clone())
        .add("帮助", help.clone())
        .add("help", help.clone())
        .add("?", help.clone())
        .add("？", help)
        .add("分数", points.clone())
        .add("points", points.clone())
        .add("point", points)
        .add("绑定", bind.clone())
        .add("bind", bind)
        .add("地图", maps.clone())
        .add("map", maps.clone())
        .add("maps", maps)
        .add("工具箱", Arc::new(ToolboxHandler))
        // 仅限 SUPER
        .add_with_permissions(
            "perm-add",
            Arc::new(PermissionAddHandler::new(users.clone())),
            vec![],
        )
        .add_with_permissions(
            "perm-rm",
            Arc::new(PermissionRemoveHandler::new(users.clone())),
            vec![],
        )
        .add_with_permissions("perm", Arc::new(PermissionCheckHandler::new(users)), vec![])
        .fallback(Arc::new(FallbackHandler))
}
