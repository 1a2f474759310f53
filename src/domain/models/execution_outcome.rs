// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::domain::models::api_definition::ApiDefinition;
use crate::domain::models::normalized_value::NormalizedValue;

/// 单次调用的终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// 2xx 响应
    Success,
    /// 非 2xx 响应
    HttpError,
    /// 连接失败等传输错误
    NetworkError,
    /// 超过定义的超时时间
    Timeout,
    /// 2xx 响应但响应体不是JSON
    ParseError,
    /// 被取消
    Cancelled,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutcomeStatus::Success => write!(f, "success"),
            OutcomeStatus::HttpError => write!(f, "http_error"),
            OutcomeStatus::NetworkError => write!(f, "network_error"),
            OutcomeStatus::Timeout => write!(f, "timeout"),
            OutcomeStatus::ParseError => write!(f, "parse_error"),
            OutcomeStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 执行结果
///
/// 一个API在一次批次运行中的不可变记录，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// API定义ID
    pub api_id: String,
    /// API显示名
    pub api_name: String,
    pub status: OutcomeStatus,
    /// HTTP状态码，仅在收到响应时存在
    pub http_status_code: Option<u16>,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
    /// 标签到规范化值的映射，包含定义的全部字段
    pub extracted_fields: BTreeMap<String, NormalizedValue>,
    pub error_detail: Option<String>,
}

impl ExecutionOutcome {
    /// 未发出请求或请求被中止的结果，所有字段均为 `Absent`
    pub fn cancelled(
        definition: &ApiDefinition,
        started_at: DateTime<Utc>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            api_id: definition.id.clone(),
            api_name: definition.name.clone(),
            status: OutcomeStatus::Cancelled,
            http_status_code: None,
            elapsed_ms,
            started_at,
            extracted_fields: definition.absent_fields(),
            error_detail: Some("cancelled before completion".to_string()),
        }
    }

    pub fn field(&self, label: &str) -> Option<&NormalizedValue> {
        self.extracted_fields.get(label)
    }
}

/// 批次统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub http_error: usize,
    pub network_error: usize,
    pub timeout: usize,
    pub parse_error: usize,
    pub cancelled: usize,
}

/// 批次
///
/// 一次执行产生的全部结果，按提交顺序排列而非完成顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    outcomes: Vec<ExecutionOutcome>,
}

impl Batch {
    pub fn new(started_at: DateTime<Utc>, elapsed_ms: u64, outcomes: Vec<ExecutionOutcome>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            elapsed_ms,
            outcomes,
        }
    }

    pub fn outcomes(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, api_id: &str) -> Option<&ExecutionOutcome> {
        self.outcomes.iter().find(|o| o.api_id == api_id)
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match outcome.status {
                OutcomeStatus::Success => summary.success += 1,
                OutcomeStatus::HttpError => summary.http_error += 1,
                OutcomeStatus::NetworkError => summary.network_error += 1,
                OutcomeStatus::Timeout => summary.timeout += 1,
                OutcomeStatus::ParseError => summary.parse_error += 1,
                OutcomeStatus::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }
}
