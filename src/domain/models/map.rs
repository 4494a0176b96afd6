// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// DDNet 地图信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub map_type: String,
    pub points: u32,
    pub difficulty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapper: Option<String>,
    /// 发布时间，格式 `YYYY-MM-DD HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// 地图类型的中文名，未知类型原样返回
pub fn map_type_label(map_type: &str) -> String {
    let label = match map_type.to_lowercase().as_str() {
        "solo" => "单人",
        "dummy" => "分身",
        "novice" => "新手",
        "moderate" => "中阶",
        "brutal" => "高阶",
        "insane" => "疯狂",
        "oldschool" => "传统",
        "race" => "竞速",
        "fun" => "娱乐",
        "ddmax.easy" => "古典.Easy",
        "ddmax.next" => "古典.Next",
        "ddmax.pro" => "古典.Pro",
        "ddmax.nut" => "古典.Nut",
        _ => return map_type.to_string(),
    };
    label.to_string()
}

/// 难度星级，共五颗
pub fn number_to_stars(difficulty: u32) -> String {
    let stars = difficulty as usize;
    format!("{}{}", "★".repeat(stars), "☆".repeat(5usize.saturating_sub(stars)))
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c == ' '
}

/// 去除分隔符 `-` `_` 和空格
pub fn remove_separator(s: &str) -> String {
    s.chars().filter(|c| !is_separator(*c)).collect()
}

/// 地图名模糊匹配
///
/// 依次尝试：首字母缩写前缀、去分隔符后包含、原名包含，均不区分大小写
pub fn check_map_name(name: &str, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let mut initials = String::new();
    let mut prev_upper = false;
    let mut prev_separator = true;
    for c in name.chars() {
        let upper = c.is_ascii_uppercase();
        if upper {
            if !prev_upper || prev_separator {
                initials.push(c);
            }
        } else if c.is_ascii_lowercase() {
            if prev_separator {
                initials.push(c);
            }
        } else if c.is_ascii_digit() || c == '.' {
            initials.push(c);
        }
        prev_upper = upper;
        prev_separator = is_separator(c);
    }

    let search_lower = search.to_lowercase();
    let search_compact = remove_separator(search).to_lowercase();

    initials.to_lowercase().starts_with(&search_compact)
        || remove_separator(name).to_lowercase().contains(&search_compact)
        || name.to_lowercase().contains(&search_lower)
}
