// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

use crate::domain::models::api_definition::{ApiDefinition, MAX_API_DEFINITIONS};
use crate::domain::services::definition_registry::DefinitionRegistry;
use crate::utils::errors::ConfigurationError;

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = "API Table Viewer/1.0";

/// 应用程序配置设置
///
/// 包含HTTP客户端、执行器和API定义列表
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP客户端配置
    pub http: HttpSettings,
    /// 执行器配置
    pub executor: ExecutorSettings,
    /// API定义，按显示顺序
    #[serde(default)]
    pub apis: Vec<ApiDefinition>,
}

/// HTTP客户端配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// 请求头中的 User-Agent
    pub user_agent: String,
    /// 建立连接的超时时间（秒）
    pub connect_timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_seconds: 10,
        }
    }
}

/// 执行器配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExecutorSettings {
    /// 一个批次中允许的最大API数量
    #[validate(range(min = 1, max = 6))]
    pub max_apis: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_apis: MAX_API_DEFINITIONS,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APITABLE_ENVIRONMENT}`
    /// 和 `APITABLE__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigurationError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigurationError> {
        let env = std::env::var("APITABLE_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("APITABLE").separator("__"));

        Self::finish(builder)
    }

    /// 从指定文件加载配置
    ///
    /// 文件格式由扩展名决定（yaml、toml、json）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let builder = Self::defaults()?.add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    /// 用配置中的API定义构建注册表
    pub fn registry(&self) -> Result<DefinitionRegistry, ConfigurationError> {
        DefinitionRegistry::new(self.apis.clone())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("http.user_agent", DEFAULT_USER_AGENT)?
            .set_default("http.connect_timeout_seconds", 10)?
            .set_default("executor.max_apis", MAX_API_DEFINITIONS as i64)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigurationError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings
            .executor
            .validate()
            .map_err(|e| ConfigError::Message(format!("executor: {}", e)))?;
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
