// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use std::time::Duration;

use crate::config::settings::HttpSettings;
use crate::domain::models::api_definition::HttpMethod;
use crate::engines::traits::{ApiRequest, ApiResponse, EngineError, HttpEngine};

/// HTTP引擎
///
/// 基于reqwest实现，所有请求共享同一个连接池
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建HTTP引擎
    ///
    /// # 参数
    ///
    /// * `settings` - HTTP配置
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - HTTP引擎
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new(settings: &HttpSettings) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .build()
            .map_err(|e| EngineError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Head => Method::HEAD,
        }
    }
}

#[async_trait]
impl HttpEngine for ReqwestEngine {
    /// 执行HTTP请求
    ///
    /// # 参数
    ///
    /// * `request` - API请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ApiResponse)` - 任意状态码的响应
    /// * `Err(EngineError)` - 传输层错误
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, EngineError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url)
            .timeout(request.timeout);

        if let Some(body) = request.body.as_ref().filter(|_| request.method.allows_body()) {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status_code, body })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
