// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::permission::Permission;

/// 机器人用户记录，以 `platform:user` 形式的 uid 为键
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    /// 绑定的游戏名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_name: Option<String>,
}
