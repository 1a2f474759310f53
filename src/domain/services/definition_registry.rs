// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::domain::models::api_definition::{ApiDefinition, MAX_API_DEFINITIONS};
use crate::domain::services::field_merger::{merge_by_label, MergedField};
use crate::utils::errors::ConfigurationError;

/// API定义注册表
///
/// 持有有序的API定义集合（最多6个），并在启用集合或定义变化时重新计算合并列
#[derive(Debug, Clone)]
pub struct DefinitionRegistry {
    definitions: Vec<ApiDefinition>,
    merged_fields: Vec<MergedField>,
}

impl DefinitionRegistry {
    /// 创建注册表
    ///
    /// # 参数
    ///
    /// * `definitions` - 按显示顺序排列的API定义
    ///
    /// # 返回值
    ///
    /// * `Ok(DefinitionRegistry)` - 所有启用的定义均有效，禁用的定义可以是未完成的草稿
    /// * `Err(ConfigurationError)` - 数量超限、ID重复或某个启用的定义无效
    pub fn new(definitions: Vec<ApiDefinition>) -> Result<Self, ConfigurationError> {
        if definitions.len() > MAX_API_DEFINITIONS {
            return Err(ConfigurationError::TooManyDefinitions {
                count: definitions.len(),
                max: MAX_API_DEFINITIONS,
            });
        }

        let mut ids = HashSet::new();
        for definition in &definitions {
            if !ids.insert(definition.id.as_str()) {
                return Err(ConfigurationError::DuplicateId(definition.id.clone()));
            }
            if definition.enabled {
                definition.ensure_valid()?;
            }
        }

        let merged_fields = merge_by_label(&definitions);
        info!(
            "Loaded {} API definitions ({} enabled, {} merged columns)",
            definitions.len(),
            definitions.iter().filter(|d| d.enabled).count(),
            merged_fields.len()
        );

        Ok(Self {
            definitions,
            merged_fields,
        })
    }

    pub fn definitions(&self) -> &[ApiDefinition] {
        &self.definitions
    }

    pub fn get(&self, api_id: &str) -> Option<&ApiDefinition> {
        self.definitions.iter().find(|d| d.id == api_id)
    }

    /// 启用定义的快照，供一次批次运行使用
    pub fn enabled_snapshot(&self) -> Vec<ApiDefinition> {
        self.definitions.iter().filter(|d| d.enabled).cloned().collect()
    }

    pub fn merged_fields(&self) -> &[MergedField] {
        &self.merged_fields
    }

    /// 启用或禁用一个定义
    ///
    /// 启用前会校验定义，校验失败时保持禁用
    pub fn set_enabled(&mut self, api_id: &str, enabled: bool) -> Result<(), ConfigurationError> {
        let definition = self
            .definitions
            .iter_mut()
            .find(|d| d.id == api_id)
            .ok_or_else(|| ConfigurationError::UnknownDefinition(api_id.to_string()))?;

        if definition.enabled != enabled {
            if enabled {
                definition.ensure_valid()?;
            }
            definition.enabled = enabled;
            self.refresh();
        }
        Ok(())
    }

    /// 新增或替换一个定义
    ///
    /// 相同ID的定义被原位替换，否则追加到末尾。只校验启用的定义。
    pub fn upsert(&mut self, definition: ApiDefinition) -> Result<(), ConfigurationError> {
        if definition.enabled {
            definition.ensure_valid()?;
        }

        match self.definitions.iter().position(|d| d.id == definition.id) {
            Some(index) => self.definitions[index] = definition,
            None => {
                if self.definitions.len() >= MAX_API_DEFINITIONS {
                    return Err(ConfigurationError::TooManyDefinitions {
                        count: self.definitions.len() + 1,
                        max: MAX_API_DEFINITIONS,
                    });
                }
                self.definitions.push(definition);
            }
        }
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        self.merged_fields = merge_by_label(&self.definitions);
        debug!("Merged columns recomputed: {}", self.merged_fields.len());
    }
}
