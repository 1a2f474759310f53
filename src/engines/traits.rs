// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::api_definition::HttpMethod;

/// 引擎错误类型
///
/// 只描述传输层的失败，由API客户端转换为执行结果状态
#[derive(Error, Debug)]
pub enum EngineError {
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 连接失败
    #[error("Connection failed: {0}")]
    Connect(String),
    /// 其他请求错误
    #[error("Request failed: {0}")]
    Request(String),
    /// 客户端构建失败
    #[error("Client build failed: {0}")]
    Build(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EngineError::Timeout
        } else if e.is_connect() {
            EngineError::Connect(e.to_string())
        } else if e.is_builder() {
            EngineError::Build(e.to_string())
        } else {
            EngineError::Request(e.to_string())
        }
    }
}

/// API请求
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// 已解析的URL
    pub url: String,
    pub timeout: Duration,
    /// JSON请求体
    pub body: Option<Value>,
}

/// API响应
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP引擎特质
#[async_trait]
pub trait HttpEngine: Send + Sync {
    /// 发送请求并读取完整响应体
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
