// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::domain::models::user::UserRecord;
use crate::infrastructure::cache::kv_store::StoreError;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 按 uid 查找用户
    async fn find(&self, uid: &str) -> Result<Option<UserRecord>, StoreError>;

    /// 保存用户记录
    async fn save(&self, uid: &str, user: &UserRecord) -> Result<(), StoreError>;
}
