// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{models::user::UserRecord, repositories::user_repository::UserRepository};
use crate::infrastructure::cache::kv_store::{KvStore, KvStoreExt, StoreError};

/// 基于键值存储的用户仓库，记录保存在 `user:<uid>`
pub struct UserRepositoryImpl {
    store: Arc<dyn KvStore>,
}

impl UserRepositoryImpl {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn key(uid: &str) -> String {
        format!("user:{}", uid)
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find(&self, uid: &str) -> Result<Option<UserRecord>, StoreError> {
        self.store.get(&Self::key(uid)).await
    }

    async fn save(&self, uid: &str, user: &UserRecord) -> Result<(), StoreError> {
        self.store.set(&Self::key(uid), user, None).await
    }
}
