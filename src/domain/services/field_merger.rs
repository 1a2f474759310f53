// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::models::api_definition::ApiDefinition;
use crate::domain::models::field_type::{FieldType, ResolvedType};

/// 合并列
///
/// 按标签跨API定义统一后的一个表格列。只由启用的定义推导，与任何执行结果无关。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedField {
    pub label: String,
    /// 声明类型不一致时为 `Mixed`
    pub resolved_type: ResolvedType,
    /// 首次出现时的声明类型，作为列的显示类型
    pub display_type: FieldType,
    pub contributing_api_ids: BTreeSet<String>,
    /// API ID 到该API的显示格式
    pub display_formats: BTreeMap<String, String>,
}

impl MergedField {
    pub fn is_declared_by(&self, api_id: &str) -> bool {
        self.contributing_api_ids.contains(api_id)
    }

    pub fn display_format(&self, api_id: &str) -> Option<&str> {
        self.display_formats.get(api_id).map(String::as_str)
    }
}

/// 按标签合并启用的API定义
///
/// 按定义顺序扫描字段，新标签追加到末尾；同一标签声明了不同类型时解析为 `Mixed`，
/// 列不会被丢弃。纯函数：相同输入总是得到相同的输出。
/// 禁用的定义和 `display_in_table = false` 的字段不参与合并。
pub fn merge_by_label(definitions: &[ApiDefinition]) -> Vec<MergedField> {
    let mut merged: Vec<MergedField> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for definition in definitions.iter().filter(|d| d.enabled) {
        for field in definition.fields.iter().filter(|f| f.display_in_table) {
            let index = match positions.get(field.label.as_str()) {
                Some(&index) => {
                    let column = &mut merged[index];
                    if column.display_type != field.field_type {
                        column.resolved_type = ResolvedType::Mixed;
                    }
                    index
                }
                None => {
                    merged.push(MergedField {
                        label: field.label.clone(),
                        resolved_type: field.field_type.into(),
                        display_type: field.field_type,
                        contributing_api_ids: BTreeSet::new(),
                        display_formats: BTreeMap::new(),
                    });
                    positions.insert(field.label.as_str(), merged.len() - 1);
                    merged.len() - 1
                }
            };

            let column = &mut merged[index];
            column.contributing_api_ids.insert(definition.id.clone());
            if let Some(format) = &field.display_format {
                column
                    .display_formats
                    .insert(definition.id.clone(), format.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
#[path = "field_merger_test.rs"]
mod tests;
