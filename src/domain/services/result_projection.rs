// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::models::execution_outcome::{Batch, ExecutionOutcome, OutcomeStatus};
use crate::domain::models::normalized_value::NormalizedValue;
use crate::domain::services::field_merger::MergedField;

/// 未声明该列的API显示的文本
pub const NOT_DECLARED_DISPLAY: &str = "-";

/// 表格单元格
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// API声明了该列
    Value { value: NormalizedValue, text: String },
    /// API没有声明该列
    NotDeclared,
}

impl Cell {
    pub fn value(&self) -> Option<&NormalizedValue> {
        match self {
            Cell::Value { value, .. } => Some(value),
            Cell::NotDeclared => None,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            Cell::Value { text, .. } => text,
            Cell::NotDeclared => NOT_DECLARED_DISPLAY,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        self.value().is_some_and(|v| v.mismatch)
    }

    /// 未声明或值缺失
    pub fn is_empty(&self) -> bool {
        self.value().map_or(true, |v| v.is_absent())
    }

    fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => a.sort_cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// 投影后的行，对应一个执行结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedRow {
    pub api_id: String,
    pub api_name: String,
    pub status: OutcomeStatus,
    pub http_status_code: Option<u16>,
    pub error_detail: Option<String>,
    /// 与合并列一一对应
    pub cells: Vec<Cell>,
}

/// 将一个执行结果投影到合并列上
///
/// Mixed 列中与首次出现类型形态不同的值会被标记为不匹配
pub fn project_outcome(schema: &[MergedField], outcome: &ExecutionOutcome) -> ProjectedRow {
    let cells = schema
        .iter()
        .map(|column| {
            if !column.is_declared_by(&outcome.api_id) {
                return Cell::NotDeclared;
            }
            let mut value = outcome
                .field(&column.label)
                .cloned()
                .unwrap_or_else(NormalizedValue::absent);
            if column.resolved_type.is_mixed() && !value.value.matches(column.display_type) {
                value = value.flagged();
            }
            let text = value.display_text(column.display_format(&outcome.api_id));
            Cell::Value { value, text }
        })
        .collect();

    ProjectedRow {
        api_id: outcome.api_id.clone(),
        api_name: outcome.api_name.clone(),
        status: outcome.status,
        http_status_code: outcome.http_status_code,
        error_detail: outcome.error_detail.clone(),
        cells,
    }
}

/// 将批次投影为表格行
///
/// 纯函数，行顺序与批次的提交顺序一致
pub fn project(schema: &[MergedField], batch: &Batch) -> Vec<ProjectedRow> {
    batch
        .outcomes()
        .iter()
        .map(|outcome| project_outcome(schema, outcome))
        .collect()
}

/// 按列排序行
///
/// 使用值的类型比较，缺失值和未声明的单元格总在最后。排序是稳定的。
pub fn sort_rows(rows: &mut [ProjectedRow], column: usize, descending: bool) {
    rows.sort_by(|a, b| {
        let (Some(left), Some(right)) = (a.cells.get(column), b.cells.get(column)) else {
            return Ordering::Equal;
        };
        match (left.is_empty(), right.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if descending => right.sort_cmp(left),
            (false, false) => left.sort_cmp(right),
        }
    });
}

#[cfg(test)]
#[path = "result_projection_test.rs"]
mod tests;
