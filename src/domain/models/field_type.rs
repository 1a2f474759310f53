// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 字段类型
///
/// 响应字段声明的规范类型，封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 字符串
    #[default]
    String,
    /// 数值
    Number,
    /// 布尔值
    Boolean,
    /// 日期
    Date,
    /// 枚举（经过映射显示）
    Enum,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::Enum => write!(f, "enum"),
        }
    }
}

/// 合并列的解析类型
///
/// 所有贡献定义声明的类型一致时与 [`FieldType`] 相同，
/// 否则为 `Mixed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Mixed,
}

impl ResolvedType {
    pub fn is_mixed(&self) -> bool {
        matches!(self, ResolvedType::Mixed)
    }
}

impl From<FieldType> for ResolvedType {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => ResolvedType::String,
            FieldType::Number => ResolvedType::Number,
            FieldType::Boolean => ResolvedType::Boolean,
            FieldType::Date => ResolvedType::Date,
            FieldType::Enum => ResolvedType::Enum,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolvedType::String => write!(f, "string"),
            ResolvedType::Number => write!(f, "number"),
            ResolvedType::Boolean => write!(f, "boolean"),
            ResolvedType::Date => write!(f, "date"),
            ResolvedType::Enum => write!(f, "enum"),
            ResolvedType::Mixed => write!(f, "mixed"),
        }
    }
}

/// 枚举值映射
///
/// 原始值到显示名的一条映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMapping {
    /// 响应中的原始值
    pub value: String,
    /// 表格中的显示名
    pub display_name: String,
}

impl EnumMapping {
    pub fn new(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: display_name.into(),
        }
    }
}
