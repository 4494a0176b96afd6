// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：权限、用户、地图与玩家
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：限流等领域服务
pub mod models;
pub mod repositories;
pub mod services;
