// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节：
/// - 缓存（cache）：键值存储抽象、内存与 Redis 实现、上游抓取缓存
/// - 抓取（fetches）：基于抓取缓存的 DDNet 数据访问
/// - 指标（metrics）：Prometheus 导出器
/// - 仓库实现（repositories）：领域仓库接口的具体实现
pub mod cache;
pub mod fetches;
pub mod metrics;
pub mod repositories;
