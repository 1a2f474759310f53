// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::settings::HttpSettings;
use crate::domain::models::api_definition::ApiDefinition;
use crate::domain::models::execution_outcome::{ExecutionOutcome, OutcomeStatus};
use crate::domain::models::normalized_value::NormalizedValue;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{ApiRequest, ApiResponse, EngineError, HttpEngine};
use crate::utils::errors::ConfigurationError;

const ERROR_BODY_EXCERPT_CHARS: usize = 200;

/// API客户端
///
/// 为一个API定义执行恰好一次HTTP请求，并把所有传输、超时和解析失败
/// 转换为执行结果的状态
pub struct ApiClient {
    engine: Arc<dyn HttpEngine>,
}

impl ApiClient {
    /// 使用默认的reqwest引擎创建客户端
    pub fn new(settings: &HttpSettings) -> Result<Self, EngineError> {
        Ok(Self::with_engine(Arc::new(ReqwestEngine::new(settings)?)))
    }

    pub fn with_engine(engine: Arc<dyn HttpEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// 执行一个API定义
    ///
    /// # 参数
    ///
    /// * `definition` - API定义，必须处于启用状态
    /// * `resolved_url` - 已解析的请求URL
    ///
    /// # 返回值
    ///
    /// * `Ok(ExecutionOutcome)` - 任何网络、超时或解析结果
    /// * `Err(ConfigurationError)` - 定义已禁用
    pub async fn execute(
        &self,
        definition: &ApiDefinition,
        resolved_url: &str,
    ) -> Result<ExecutionOutcome, ConfigurationError> {
        if !definition.enabled {
            return Err(ConfigurationError::DefinitionDisabled(definition.id.clone()));
        }
        Ok(self.dispatch(definition, resolved_url).await)
    }

    /// 发送请求，调用方已检查前置条件
    pub(crate) async fn dispatch(
        &self,
        definition: &ApiDefinition,
        resolved_url: &str,
    ) -> ExecutionOutcome {
        let request = ApiRequest {
            method: definition.method,
            url: resolved_url.to_string(),
            timeout: definition.timeout(),
            body: definition.body.clone(),
        };

        debug!(
            "Calling API {} via {}: {} {}",
            definition.id,
            self.engine.name(),
            request.method.as_str(),
            request.url
        );

        let started_at = Utc::now();
        let start = Instant::now();
        let result = tokio::time::timeout(request.timeout, self.engine.send(&request)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let outcome = match result {
            Err(_) | Ok(Err(EngineError::Timeout)) => {
                warn!(
                    "API {} timed out after {:.3}s",
                    definition.id, definition.timeout_seconds
                );
                failed(
                    definition,
                    OutcomeStatus::Timeout,
                    started_at,
                    elapsed_ms,
                    format!("timed out after {}s", definition.timeout_seconds),
                )
            }
            Ok(Err(e)) => {
                warn!("API {} failed: {}", definition.id, e);
                failed(
                    definition,
                    OutcomeStatus::NetworkError,
                    started_at,
                    elapsed_ms,
                    e.to_string(),
                )
            }
            Ok(Ok(response)) => from_response(definition, response, started_at, elapsed_ms),
        };

        info!(
            "API {} finished: {} ({}ms)",
            definition.id, outcome.status, outcome.elapsed_ms
        );
        outcome
    }
}

fn failed(
    definition: &ApiDefinition,
    status: OutcomeStatus,
    started_at: DateTime<Utc>,
    elapsed_ms: u64,
    detail: String,
) -> ExecutionOutcome {
    build(
        definition,
        status,
        None,
        started_at,
        elapsed_ms,
        definition.absent_fields(),
        Some(detail),
    )
}

fn from_response(
    definition: &ApiDefinition,
    response: ApiResponse,
    started_at: DateTime<Utc>,
    elapsed_ms: u64,
) -> ExecutionOutcome {
    let code = response.status_code;
    let ok = response.is_success();
    let http_detail = || format!("HTTP {}", code);

    if response.body.trim().is_empty() {
        let (status, detail) = if ok {
            (OutcomeStatus::Success, None)
        } else {
            (OutcomeStatus::HttpError, Some(http_detail()))
        };
        return build(
            definition,
            status,
            Some(code),
            started_at,
            elapsed_ms,
            definition.absent_fields(),
            detail,
        );
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(body) => {
            let (status, detail) = if ok {
                (OutcomeStatus::Success, None)
            } else {
                (OutcomeStatus::HttpError, Some(http_detail()))
            };
            build(
                definition,
                status,
                Some(code),
                started_at,
                elapsed_ms,
                definition.normalize_fields(Some(&body)),
                detail,
            )
        }
        Err(e) if ok => {
            warn!("API {} returned a non-JSON body: {}", definition.id, e);
            build(
                definition,
                OutcomeStatus::ParseError,
                Some(code),
                started_at,
                elapsed_ms,
                definition.absent_fields(),
                Some(format!("invalid JSON response: {}", e)),
            )
        }
        Err(_) => {
            let excerpt: String = response
                .body
                .chars()
                .take(ERROR_BODY_EXCERPT_CHARS)
                .collect();
            build(
                definition,
                OutcomeStatus::HttpError,
                Some(code),
                started_at,
                elapsed_ms,
                definition.absent_fields(),
                Some(format!("{}: {}", http_detail(), excerpt.trim())),
            )
        }
    }
}

fn build(
    definition: &ApiDefinition,
    status: OutcomeStatus,
    http_status_code: Option<u16>,
    started_at: DateTime<Utc>,
    elapsed_ms: u64,
    extracted_fields: BTreeMap<String, NormalizedValue>,
    error_detail: Option<String>,
) -> ExecutionOutcome {
    ExecutionOutcome {
        api_id: definition.id.clone(),
        api_name: definition.name.clone(),
        status,
        http_status_code,
        elapsed_ms,
        started_at,
        extracted_fields,
        error_detail,
    }
}

#[cfg(test)]
#[path = "api_client_test.rs"]
mod tests;
