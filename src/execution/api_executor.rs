// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

use crate::config::settings::ExecutorSettings;
use crate::domain::models::api_definition::{ApiDefinition, MAX_API_DEFINITIONS};
use crate::domain::models::execution_outcome::{Batch, ExecutionOutcome};
use crate::execution::api_client::ApiClient;
use crate::execution::cancellation::CancellationToken;
use crate::utils::errors::ConfigurationError;

/// 批次进度事件，按完成顺序发出
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// 已完成的单元数，包含本次
    pub completed: usize,
    pub total: usize,
    pub outcome: &'a ExecutionOutcome,
}

/// API执行器
///
/// 为每个启用的API定义并发执行一次调用，汇总结果并按提交顺序返回
pub struct ApiExecutor {
    client: Arc<ApiClient>,
    max_apis: usize,
}

impl ApiExecutor {
    pub fn new(client: Arc<ApiClient>, settings: &ExecutorSettings) -> Self {
        Self {
            client,
            max_apis: settings.max_apis.clamp(1, MAX_API_DEFINITIONS),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// 运行一个批次
    ///
    /// 每个定义一个并发单元，只受自身超时约束，一个单元失败不会影响其他单元。
    /// `on_progress` 在每个单元完成时调用一次；返回的批次按提交顺序排列。
    ///
    /// 取消时，仍在进行中的请求future会被直接丢弃（连接在下一个等待点中止，
    /// 不会等待传输层超时），对应单元记为 `Cancelled`；已完成的单元保留真实结果。
    ///
    /// # 参数
    ///
    /// * `definitions` - 启用的API定义快照，按显示顺序
    /// * `cancel` - 取消令牌；取消后未完成的单元标记为 `Cancelled`
    /// * `on_progress` - 进度回调
    ///
    /// # 返回值
    ///
    /// * `Ok(Batch)` - 每个定义恰好一个结果
    /// * `Err(ConfigurationError)` - 前置条件不满足，未发出任何请求
    pub async fn run_batch<F>(
        &self,
        definitions: &[ApiDefinition],
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<Batch, ConfigurationError>
    where
        F: FnMut(BatchProgress<'_>),
    {
        let urls = self.prepare(definitions)?;
        let total = definitions.len();
        let started_at = Utc::now();
        let start = Instant::now();

        info!("Starting batch of {} APIs", total);

        let mut slots: Vec<Option<ExecutionOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        if cancel.is_cancelled() {
            info!("Batch cancelled before start, no requests issued");
            for (slot, definition) in slots.iter_mut().zip(definitions) {
                let outcome = ExecutionOutcome::cancelled(definition, started_at, 0);
                completed += 1;
                on_progress(BatchProgress {
                    completed,
                    total,
                    outcome: &outcome,
                });
                *slot = Some(outcome);
            }
        } else {
            let client = self.client.as_ref();
            let mut units: FuturesUnordered<_> = definitions
                .iter()
                .zip(&urls)
                .enumerate()
                .map(|(index, (definition, url))| {
                    async move {
                        let unit_started_at = Utc::now();
                        let unit_start = Instant::now();
                        let outcome = tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                info!("API {} cancelled", definition.id);
                                ExecutionOutcome::cancelled(
                                    definition,
                                    unit_started_at,
                                    unit_start.elapsed().as_millis() as u64,
                                )
                            }
                            outcome = client.dispatch(definition, url) => outcome,
                        };
                        (index, outcome)
                    }
                })
                .collect();

            while let Some((index, outcome)) = units.next().await {
                completed += 1;
                on_progress(BatchProgress {
                    completed,
                    total,
                    outcome: &outcome,
                });
                slots[index] = Some(outcome);
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let outcomes = slots
            .into_iter()
            .zip(definitions)
            .map(|(slot, definition)| {
                slot.unwrap_or_else(|| ExecutionOutcome::cancelled(definition, started_at, elapsed_ms))
            })
            .collect();

        let batch = Batch::new(started_at, elapsed_ms, outcomes);
        let summary = batch.summary();
        info!(
            "Batch {} finished: {}/{} succeeded in {}ms",
            batch.id, summary.success, summary.total, elapsed_ms
        );
        Ok(batch)
    }

    /// 单独执行一个定义，不经过批次的进度和取消机制
    pub async fn test_single(
        &self,
        definition: &ApiDefinition,
    ) -> Result<ExecutionOutcome, ConfigurationError> {
        let url = definition.ensure_valid()?;
        self.client.execute(definition, &url).await
    }

    /// 检查批次前置条件并解析所有URL
    fn prepare(&self, definitions: &[ApiDefinition]) -> Result<Vec<String>, ConfigurationError> {
        if definitions.is_empty() {
            return Err(ConfigurationError::NoEnabledDefinitions);
        }
        if definitions.len() > self.max_apis {
            return Err(ConfigurationError::TooManyDefinitions {
                count: definitions.len(),
                max: self.max_apis,
            });
        }

        let mut ids = HashSet::new();
        definitions
            .iter()
            .map(|definition| {
                if !definition.enabled {
                    return Err(ConfigurationError::DefinitionDisabled(definition.id.clone()));
                }
                if !ids.insert(definition.id.as_str()) {
                    return Err(ConfigurationError::DuplicateId(definition.id.clone()));
                }
                definition.ensure_valid()
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "api_executor_test.rs"]
mod tests;
