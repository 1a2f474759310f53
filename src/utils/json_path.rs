// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

/// 在JSON值中按路径查找
///
/// 支持两种写法：
/// * JSON Pointer，以 `/` 开头，例如 `/applications/0/id`
/// * 点路径，例如 `applications.0.id` 或 `applications[0].id`
///
/// 空路径表示整个响应体。路径不存在时返回 `None`。
pub fn resolve<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(body);
    }
    if path.starts_with('/') {
        return body.pointer(path);
    }

    let mut current = body;
    for segment in path.split('.') {
        let (key, indexes) = split_segment(segment)?;
        if !key.is_empty() {
            current = step(current, key)?;
        }
        for index in indexes {
            current = current.as_array()?.get(index)?;
        }
    }
    Some(current)
}

fn step<'a>(current: &'a Value, key: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// 拆分 `key[0][1]` 形式的路径段
fn split_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(open) = segment.find('[') else {
        if segment.is_empty() {
            return None;
        }
        return Some((segment, Vec::new()));
    };

    let key = &segment[..open];
    let mut rest = &segment[open..];
    let mut indexes = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indexes.push(inner[..close].trim().parse::<usize>().ok()?);
        rest = &inner[close + 1..];
    }
    Some((key, indexes))
}
