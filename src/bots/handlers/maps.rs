// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::bots::protocol::{CommandHandler, HandlerContext, Link, SendResult};
use crate::domain::models::map::{
    check_map_name, map_type_label, number_to_stars, remove_separator, MapInfo,
};
use crate::infrastructure::fetches::maps::MapCache;
use crate::utils::errors::BotError;

const RANDOM: &str = "random";

/// 地图类型关键字，按顺序匹配前缀
const MAP_TYPE_KEYWORDS: [(&str, &str); 25] = [
    ("-ro", RANDOM),
    ("-rnd", RANDOM),
    ("随", RANDOM),
    ("-n", "novice"),
    ("-m", "moderate"),
    ("-b", "brutal"),
    ("-i", "insane"),
    ("-dd", "ddmax"),
    ("-o", "oldschool"),
    ("-du", "dummy"),
    ("-s", "solo"),
    ("-ra", "race"),
    ("-f", "fun"),
    ("-e", "event"),
    ("新", "novice"),
    ("中", "moderate"),
    ("高", "brutal"),
    ("疯", "insane"),
    ("古", "ddmax"),
    ("传", "oldschool"),
    ("分", "dummy"),
    ("单", "solo"),
    ("竞", "race"),
    ("娱", "fun"),
    ("活", "event"),
];

const DIFFICULTY_KEYWORDS: [(&str, u32); 10] = [
    ("1", 1),
    ("2", 2),
    ("3", 3),
    ("4", 4),
    ("5", 5),
    ("一", 1),
    ("二", 2),
    ("三", 3),
    ("四", 4),
    ("五", 5),
];

/// 解析后的地图查询
#[derive(Debug, Clone, PartialEq, Eq)]
struct MapQuery {
    map_type: Option<&'static str>,
    difficulty: Option<u32>,
    name: String,
}

impl MapQuery {
    /// 第一个词为类型关键字时，其后独立的难度词也会被识别
    fn parse(args: &str) -> Self {
        let args = args.trim();
        let lower = args.to_lowercase();
        let map_type = MAP_TYPE_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.starts_with(keyword))
            .map(|(_, map_type)| *map_type);

        let Some(map_type) = map_type else {
            return Self {
                map_type: None,
                difficulty: None,
                name: args.to_string(),
            };
        };

        let mut difficulty = None;
        let mut words = Vec::new();
        for word in args.split_whitespace().skip(1) {
            let level = DIFFICULTY_KEYWORDS
                .iter()
                .find(|(keyword, _)| *keyword == word)
                .map(|(_, level)| *level);
            match level {
                Some(level) if difficulty.is_none() => difficulty = Some(level),
                _ => words.push(word),
            }
        }

        Self {
            map_type: Some(map_type),
            difficulty,
            name: words.join(" "),
        }
    }

    fn matches(&self, map: &MapInfo) -> bool {
        let type_ok = match self.map_type {
            None | Some(RANDOM) => true,
            Some(map_type) => map.map_type.to_lowercase().starts_with(map_type),
        };
        type_ok && self.difficulty.is_none_or(|level| map.difficulty == level)
    }

    /// 如 `新手 ★★☆☆☆`
    fn descriptor(&self) -> String {
        let mut parts = Vec::new();
        if let Some(map_type) = self.map_type.filter(|map_type| *map_type != RANDOM) {
            parts.push(map_type_label(map_type));
        }
        if let Some(level) = self.difficulty {
            parts.push(number_to_stars(level));
        }
        parts.join(" ")
    }

    fn list_url(&self) -> String {
        match self.map_type {
            Some(map_type) if map_type != RANDOM => match self.difficulty {
                Some(level) => format!(
                    "https://teeworlds.cn/goto#mstype={}&diff={}",
                    map_type, level
                ),
                None => format!("https://teeworlds.cn/goto#mstype={}", map_type),
            },
            _ => match self.difficulty {
                Some(level) => format!("https://teeworlds.cn/goto#msdiff={}", level),
                None => "https://teeworlds.cn/goto#ms".to_string(),
            },
        }
    }
}

fn summary_line(map: &MapInfo) -> String {
    format!(
        "[{} {}] {}pts",
        map_type_label(&map.map_type),
        number_to_stars(map.difficulty),
        map.points
    )
}

/// 名字搜索排序：完全匹配 > 大小写一致 > 前缀匹配 > 分数低 > 发布早
fn compare_candidates(a: &MapInfo, b: &MapInfo, query: &str) -> Ordering {
    let query_lower = query.to_lowercase();
    let a_exact = a.name.to_lowercase() == query_lower;
    let b_exact = b.name.to_lowercase() == query_lower;

    if a_exact && b_exact {
        let a_case = a.name == query;
        let b_case = b.name == query;
        if a_case != b_case {
            return if a_case {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
    } else if a_exact {
        return Ordering::Less;
    } else if b_exact {
        return Ordering::Greater;
    }

    let query_compact = remove_separator(query);
    let query_compact_lower = query_compact.to_lowercase();
    let a_compact = remove_separator(&a.name);
    let b_compact = remove_separator(&b.name);
    let a_prefix = a_compact.to_lowercase().starts_with(&query_compact_lower);
    let b_prefix = b_compact.to_lowercase().starts_with(&query_compact_lower);

    if a_prefix != b_prefix {
        return if a_prefix {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let a_case_prefix = a_compact.starts_with(&query_compact);
    let b_case_prefix = b_compact.starts_with(&query_compact);
    if a_case_prefix != b_case_prefix {
        return if a_case_prefix {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    a.points.cmp(&b.points).then_with(|| {
        a.release
            .as_deref()
            .unwrap_or_default()
            .cmp(b.release.as_deref().unwrap_or_default())
    })
}

/// 地图查询
///
/// 带类型关键字且没有地图名时随机挑选一张
pub struct MapsHandler {
    maps: Arc<MapCache>,
}

impl MapsHandler {
    pub fn new(maps: Arc<MapCache>) -> Self {
        Self { maps }
    }

    async fn random_map(
        &self,
        ctx: &HandlerContext,
        query: &MapQuery,
        maps: &[MapInfo],
    ) -> Result<SendResult, BotError> {
        let candidates: Vec<&MapInfo> = maps.iter().filter(|map| query.matches(map)).collect();
        let descriptor = query.descriptor();

        let picked = candidates.choose(&mut rand::rng()).copied();
        let Some(map) = picked else {
            return ctx.reply.text(&format!("不存在 {} 图", descriptor)).await;
        };

        let title = match map.mapper.as_deref() {
            Some(mapper) => format!("{} (by {})", map.name, mapper),
            None => map.name.clone(),
        };
        let (intro, link) = if descriptor.is_empty() {
            (
                "随机找了一张图".to_string(),
                Link::new("🔗 查看所有图", "地图列表: ", "https://teeworlds.cn/goto#m"),
            )
        } else {
            (
                format!("随机找了一张 {} 图", descriptor),
                Link::new(
                    format!("🔗 查看所有 {} 图", descriptor),
                    format!("{} 图列表: ", descriptor),
                    query.list_url(),
                ),
            )
        };

        let lines = [intro, title, summary_line(map)];
        ctx.reply
            .image_text_link(&lines.join("\n"), map.thumbnail.as_deref(), &link)
            .await
    }
}

#[async_trait]
impl CommandHandler for MapsHandler {
    async fn handle(&self, ctx: &HandlerContext) -> Result<SendResult, BotError> {
        if ctx.args.trim().is_empty() {
            return ctx
                .reply
                .text_link(
                    "查图请提供 <地图名>。或者使用 DDNet 工具箱",
                    &Link::new("🔗 排名查询工具", "→ ", "https://teeworlds.cn/goto#m"),
                )
                .await;
        }

        let query = MapQuery::parse(&ctx.args);
        let maps = self.maps.fetch(false).await?.result;

        if query.name.is_empty() {
            return self.random_map(ctx, &query, &maps).await;
        }

        let target = maps
            .iter()
            .filter(|map| query.matches(map) && check_map_name(&map.name, &query.name))
            .min_by(|a, b| compare_candidates(a, b, &query.name));

        let Some(map) = target else {
            return ctx
                .reply
                .text(&format!("未找到名为 {} 的地图", query.name))
                .await;
        };

        let lines = [
            format!(
                "{} (by {})",
                map.name,
                map.mapper.as_deref().unwrap_or("不详")
            ),
            summary_line(map),
        ];
        ctx.reply
            .image_text_link(
                &lines.join("\n"),
                map.thumbnail.as_deref(),
                &Link::new(
                    "🔗 地图详情",
                    "详情: ",
                    format!("https://teeworlds.cn/goto#m{}", urlencoding::encode(&map.name)),
                ),
            )
            .await
    }
}
