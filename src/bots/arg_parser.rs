// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 指令参数解析器
///
/// 按空白切分参数，引号内的内容作为一个参数，`\"` 和 `\'` 为转义的引号。
/// 每个原始片段保留其后的空白，`get_rest` 拼接后可还原剩余文本
pub struct ArgParser {
    parts: Vec<String>,
}

impl ArgParser {
    pub fn new(command: &str) -> Self {
        let chars: Vec<char> = command.chars().collect();
        let mut parts = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }

            let start = i;
            let c = chars[i];
            if c == '"' || c == '\'' {
                i += 1;
                while i < chars.len() {
                    let closes = chars[i] == c && chars[i - 1] != '\\';
                    i += 1;
                    if closes {
                        break;
                    }
                }
            } else {
                while i < chars.len() {
                    if chars[i] == '\\' && chars.get(i + 1) == Some(&'"') {
                        i += 2;
                        continue;
                    }
                    if chars[i] == '"' || chars[i].is_whitespace() {
                        break;
                    }
                    i += 1;
                }
            }

            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            parts.push(chars[start..i].iter().collect());
        }

        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// 第 `index` 个参数，去除引号与转义
    pub fn get_string(&self, index: usize) -> Option<String> {
        let part = self.parts.get(index)?;
        let unescaped = part
            .trim_end()
            .replace("\\\"", "\"")
            .replace("\\'", "'");
        Some(strip_quotes(&unescaped).to_string())
    }

    /// 按前缀解析整数，`"12abc"` 得到 12
    pub fn get_int(&self, index: usize) -> Option<i64> {
        let s = self.get_string(index)?;
        let s = s.trim_start();
        let sign_len = usize::from(s.starts_with(['+', '-']));
        let digits = s[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len() - sign_len);
        if digits == 0 {
            return None;
        }
        s[..sign_len + digits].parse().ok()
    }

    /// 按前缀解析浮点数
    pub fn get_float(&self, index: usize) -> Option<f64> {
        let s = self.get_string(index)?;
        let s = s.trim_start();
        let candidate: String = s
            .chars()
            .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
            .collect();
        (1..=candidate.len())
            .rev()
            .find_map(|end| candidate[..end].parse::<f64>().ok())
    }

    /// 从第 `index` 个参数开始的剩余文本
    pub fn get_rest(&self, index: usize) -> Option<String> {
        let rest = self.parts.get(index..)?.concat();
        let rest = strip_quotes(&rest);
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
