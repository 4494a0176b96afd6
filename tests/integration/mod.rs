// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod bot_routes_test;
pub mod health_check;
pub mod helpers;
pub mod maps_api_test;
pub mod servers_api_test;
