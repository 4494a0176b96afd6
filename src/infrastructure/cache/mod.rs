// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 键值存储与上游抓取缓存
pub mod fetch_cache;
pub mod kv_store;
pub mod memory_store;
pub mod redis_client;
