// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

use crate::domain::models::field_type::{EnumMapping, FieldType};

/// 缺失值的显示文本
pub const ABSENT_DISPLAY: &str = "N/A";

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// 日期值
///
/// 保留原始精度：带时区的时间、本地时间或仅日期
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "precision", content = "value", rename_all = "snake_case")]
pub enum FlexibleDate {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
    Day(NaiveDate),
}

impl FlexibleDate {
    /// 按固定的类ISO格式集合解析日期
    ///
    /// 依次尝试 RFC 3339、带偏移的空格分隔格式、本地时间格式和纯日期格式
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(FlexibleDate::Zoned(dt));
        }
        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(input, format) {
                return Some(FlexibleDate::Zoned(dt));
            }
        }
        for format in LOCAL_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
                return Some(FlexibleDate::Local(dt));
            }
        }
        for format in DAY_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(input, format) {
                return Some(FlexibleDate::Day(d));
            }
        }
        None
    }

    /// 排序键，带时区的时间统一换算为UTC
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            FlexibleDate::Zoned(dt) => dt.naive_utc(),
            FlexibleDate::Local(dt) => *dt,
            FlexibleDate::Day(d) => d.and_time(chrono::NaiveTime::MIN),
        }
    }
}

impl fmt::Display for FlexibleDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlexibleDate::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            FlexibleDate::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            FlexibleDate::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// 规范化后的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FlexibleValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(FlexibleDate),
    EnumDisplay(String),
    Absent,
}

impl FlexibleValue {
    /// 值的形态是否与字段类型一致，`Absent` 与任何类型都一致
    pub fn matches(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (FlexibleValue::Absent, _)
                | (FlexibleValue::Text(_), FieldType::String)
                | (FlexibleValue::Number(_), FieldType::Number)
                | (FlexibleValue::Boolean(_), FieldType::Boolean)
                | (FlexibleValue::Date(_), FieldType::Date)
                | (FlexibleValue::EnumDisplay(_), FieldType::Enum)
        )
    }
}

/// 带类型不匹配标记的规范化值
///
/// `mismatch` 为 true 表示按声明类型转换失败，`value` 是尽力而为的回退结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedValue {
    pub value: FlexibleValue,
    pub mismatch: bool,
}

impl NormalizedValue {
    pub fn absent() -> Self {
        Self::exact(FlexibleValue::Absent)
    }

    pub fn exact(value: FlexibleValue) -> Self {
        Self {
            value,
            mismatch: false,
        }
    }

    pub fn mismatched(value: FlexibleValue) -> Self {
        Self {
            value,
            mismatch: true,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.value, FlexibleValue::Absent)
    }

    /// 返回设置了不匹配标记的副本
    pub fn flagged(mut self) -> Self {
        self.mismatch = true;
        self
    }

    /// 显示文本
    ///
    /// `format` 中的 `{value}` 会被替换为值的文本，缺失值固定显示为 `N/A`
    pub fn display_text(&self, format: Option<&str>) -> String {
        let text = match &self.value {
            FlexibleValue::Absent => return ABSENT_DISPLAY.to_string(),
            FlexibleValue::Text(s) | FlexibleValue::EnumDisplay(s) => s.clone(),
            FlexibleValue::Number(n) => n.to_string(),
            FlexibleValue::Boolean(b) => b.to_string(),
            FlexibleValue::Date(d) => d.to_string(),
        };
        match format {
            Some(format) if format.contains("{value}") => format.replace("{value}", &text),
            _ => text,
        }
    }

    /// 排序比较
    ///
    /// 同类值按类型比较，不同类值按显示文本比较，缺失值始终排在最后
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (&self.value, &other.value) {
            (FlexibleValue::Absent, FlexibleValue::Absent) => Ordering::Equal,
            (FlexibleValue::Absent, _) => Ordering::Greater,
            (_, FlexibleValue::Absent) => Ordering::Less,
            (FlexibleValue::Number(a), FlexibleValue::Number(b)) => a.total_cmp(b),
            (FlexibleValue::Date(a), FlexibleValue::Date(b)) => a.sort_key().cmp(&b.sort_key()),
            (FlexibleValue::Boolean(a), FlexibleValue::Boolean(b)) => a.cmp(b),
            _ => self.display_text(None).cmp(&other.display_text(None)),
        }
    }
}

/// 将任意JSON值按声明类型规范化
///
/// 永不失败：缺失或 `null` 得到 `Absent`；存在但形态不符的值回退为字符串并标记不匹配
pub fn normalize(
    raw: Option<&Value>,
    declared_type: FieldType,
    enum_mapping: Option<&[EnumMapping]>,
) -> NormalizedValue {
    let raw = match raw {
        None | Some(Value::Null) => return NormalizedValue::absent(),
        Some(raw) => raw,
    };

    match declared_type {
        FieldType::String => coerce_string(raw),
        FieldType::Number => coerce_number(raw),
        FieldType::Boolean => coerce_boolean(raw),
        FieldType::Date => coerce_date(raw),
        FieldType::Enum => coerce_enum(raw, enum_mapping),
    }
}

fn coerce_string(raw: &Value) -> NormalizedValue {
    match raw {
        Value::String(s) => NormalizedValue::exact(FlexibleValue::Text(s.clone())),
        Value::Number(n) => NormalizedValue::exact(FlexibleValue::Text(n.to_string())),
        Value::Bool(b) => NormalizedValue::exact(FlexibleValue::Text(b.to_string())),
        _ => fallback(raw),
    }
}

fn coerce_number(raw: &Value) -> NormalizedValue {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => NormalizedValue::exact(FlexibleValue::Number(n)),
        _ => fallback(raw),
    }
}

fn coerce_boolean(raw: &Value) -> NormalizedValue {
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    match parsed {
        Some(b) => NormalizedValue::exact(FlexibleValue::Boolean(b)),
        None => fallback(raw),
    }
}

fn coerce_date(raw: &Value) -> NormalizedValue {
    match raw.as_str().and_then(FlexibleDate::parse) {
        Some(date) => NormalizedValue::exact(FlexibleValue::Date(date)),
        None => fallback(raw),
    }
}

fn coerce_enum(raw: &Value, enum_mapping: Option<&[EnumMapping]>) -> NormalizedValue {
    match raw {
        Value::Array(items) => {
            if items.is_empty() {
                return NormalizedValue::absent();
            }
            let mut names = Vec::with_capacity(items.len());
            let mut mismatch = false;
            for item in items {
                let Some(key) = scalar_key(item) else {
                    return fallback(raw);
                };
                let (name, hit) = lookup(&key, enum_mapping);
                mismatch |= !hit;
                names.push(name);
            }
            NormalizedValue {
                value: FlexibleValue::EnumDisplay(names.join(", ")),
                mismatch,
            }
        }
        _ => match scalar_key(raw) {
            Some(key) => {
                let (name, hit) = lookup(&key, enum_mapping);
                NormalizedValue {
                    value: FlexibleValue::EnumDisplay(name),
                    mismatch: !hit,
                }
            }
            None => fallback(raw),
        },
    }
}

// Without a configured mapping every raw value is its own display name.
fn lookup(key: &str, enum_mapping: Option<&[EnumMapping]>) -> (String, bool) {
    match enum_mapping {
        None => (key.to_string(), true),
        Some(mappings) => match mappings.iter().find(|m| m.value == key) {
            Some(m) => (m.display_name.clone(), true),
            None => (key.to_string(), false),
        },
    }
}

fn scalar_key(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn fallback(raw: &Value) -> NormalizedValue {
    let text = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    NormalizedValue::mismatched(FlexibleValue::Text(text))
}

#[cfg(test)]
#[path = "normalized_value_test.rs"]
mod tests;
