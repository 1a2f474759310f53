// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod mock_server;

use apitable::config::settings::{ExecutorSettings, HttpSettings};
use apitable::domain::models::api_definition::{ApiDefinition, ApiFieldDefinition};
use apitable::domain::models::field_type::{EnumMapping, FieldType};
use apitable::execution::api_client::ApiClient;
use apitable::execution::api_executor::ApiExecutor;
use std::sync::Arc;

pub fn executor() -> ApiExecutor {
    let client = ApiClient::new(&HttpSettings::default()).unwrap();
    ApiExecutor::new(Arc::new(client), &ExecutorSettings::default())
}

/// 经费申请（类型A）
pub fn expense_definition(base_url: &str) -> ApiDefinition {
    ApiDefinition::new(
        "expense_api",
        "Expense",
        format!("{}/applications/{{kind}}", base_url),
    )
    .with_param("kind", "type-a")
    .with_timeout_seconds(5.0)
    .with_field(ApiFieldDefinition::new("ID", "applications.0.id", FieldType::String))
    .with_field(
        ApiFieldDefinition::new("Status", "applications.0.status", FieldType::Enum)
            .with_enum_mapping(vec![
                EnumMapping::new("SUBMITTED", "Submitted"),
                EnumMapping::new("APPROVED", "Approved"),
            ]),
    )
    .with_field(
        ApiFieldDefinition::new("Amount", "applications[0].amount", FieldType::Number)
            .with_display_format("{value} JPY"),
    )
    .with_field(ApiFieldDefinition::new(
        "Created",
        "applications.0.createdAt",
        FieldType::Date,
    ))
}

/// 休假申请（类型B）
pub fn leave_definition(base_url: &str) -> ApiDefinition {
    ApiDefinition::new(
        "leave_api",
        "Leave",
        format!("{}/applications/type-b", base_url),
    )
    .with_timeout_seconds(5.0)
    .with_field(ApiFieldDefinition::new("ID", "applications.0.id", FieldType::String))
    .with_field(ApiFieldDefinition::new("Days", "applications.0.days", FieldType::Number))
    .with_field(ApiFieldDefinition::new(
        "Start",
        "applications.0.startDate",
        FieldType::Date,
    ))
}

/// 权限申请（类型C）
pub fn permission_definition(base_url: &str) -> ApiDefinition {
    ApiDefinition::new(
        "permission_api",
        "Permission",
        format!("{}/applications/type-c", base_url),
    )
    .with_timeout_seconds(5.0)
    .with_field(ApiFieldDefinition::new("ID", "applications.0.id", FieldType::String))
    .with_field(ApiFieldDefinition::new(
        "Role",
        "applications.0.requestedRole",
        FieldType::Enum,
    ))
    .with_field(ApiFieldDefinition::new(
        "First approver",
        "/applications/0/approvalFlow/0/approver/name",
        FieldType::String,
    ))
}

/// 指向任意端点、只提取ID的定义
pub fn id_only_definition(id: &str, url: String, timeout_seconds: f64) -> ApiDefinition {
    ApiDefinition::new(id, id, url)
        .with_timeout_seconds(timeout_seconds)
        .with_field(ApiFieldDefinition::new("ID", "applications.0.id", FieldType::String))
}
