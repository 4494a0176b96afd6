// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 上游数据访问模块
///
/// 基于 FetchCache 的 DDNet 地图、服务器与玩家数据
pub mod maps;
pub mod players;
pub mod servers;
