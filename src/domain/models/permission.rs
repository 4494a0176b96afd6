// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// 用户权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// 超级管理员，拥有所有权限
    Super,
    GroupSettings,
    Register,
    ChannelSettings,
    Tickets,
    Posting,
    DdnetMod,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::Super,
        Permission::GroupSettings,
        Permission::Register,
        Permission::ChannelSettings,
        Permission::Tickets,
        Permission::Posting,
        Permission::DdnetMod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Super => "SUPER",
            Permission::GroupSettings => "GROUP_SETTINGS",
            Permission::Register => "REGISTER",
            Permission::ChannelSettings => "CHANNEL_SETTINGS",
            Permission::Tickets => "TICKETS",
            Permission::Posting => "POSTING",
            Permission::DdnetMod => "DDNET_MOD",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown permission \"{0}\"")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    /// 不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == upper)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// 检查权限，`SUPER` 总是通过
pub fn has_permission(permissions: &[Permission], permission: Permission) -> bool {
    permissions
        .iter()
        .any(|held| *held == Permission::Super || *held == permission)
}
