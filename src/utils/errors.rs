// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 配置错误类型
///
/// 在发出任何网络请求之前检测到的错误。对请求的操作是致命的，
/// 会立即返回给调用方。
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("没有启用的API定义")]
    NoEnabledDefinitions,

    #[error("API定义过多: {count} (最多 {max})")]
    TooManyDefinitions { count: usize, max: usize },

    #[error("重复的API ID: {0}")]
    DuplicateId(String),

    #[error("API {api_id} 中存在重复的标签: {label}")]
    DuplicateLabel { api_id: String, label: String },

    #[error("未知的API定义: {0}")]
    UnknownDefinition(String),

    #[error("API已禁用: {0}")]
    DefinitionDisabled(String),

    #[error("无效的HTTP方法: {0}")]
    InvalidMethod(String),

    #[error("API {api_id} 的URL无效: {reason}")]
    InvalidUrl { api_id: String, reason: String },

    #[error("API {api_id} 的URL模板参数未解析: {parameter}")]
    UnresolvedTemplateParameter { api_id: String, parameter: String },

    #[error("API {id} 的定义无效: {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("配置加载失败: {0}")]
    Settings(#[from] config::ConfigError),
}
