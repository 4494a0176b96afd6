// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单项排名
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 名次，未上榜为 `None`
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub points: u32,
}

/// 玩家排名信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// 总通过分
    #[serde(default)]
    pub points: RankEntry,
    /// 团队排位
    #[serde(default)]
    pub team: RankEntry,
    /// 个人排位
    #[serde(default)]
    pub rank: RankEntry,
    /// 过去一年获得的分数
    #[serde(default)]
    pub yearly: RankEntry,
}

/// 玩家查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerLookup {
    /// 玩家数据尚未加载
    Unavailable,
    NotFound,
    Found(Player),
}
