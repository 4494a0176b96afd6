// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 指令处理器
pub mod admin;
pub mod bind;
pub mod fallback;
pub mod help;
pub mod info;
pub mod maps;
pub mod points;
