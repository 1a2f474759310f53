// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::domain::models::field_type::{EnumMapping, FieldType};
use crate::domain::models::normalized_value::{normalize, NormalizedValue};
use crate::engines::validators;
use crate::utils::errors::ConfigurationError;
use crate::utils::json_path;

/// 一个配置中允许的最大API定义数量
pub const MAX_API_DEFINITIONS: usize = 6;

/// 未配置时的默认超时时间（秒）
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 30.0;

static TEMPLATE_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_\-]+)\}").expect("Failed to compile template parameter regex")
});

/// HTTP方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }

    /// 是否允许携带请求体
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(ConfigurationError::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// 响应字段定义
///
/// 归属于唯一的 [`ApiDefinition`]。`label` 是跨API合并列时使用的键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFieldDefinition {
    /// 表格列的显示名（合并键）
    pub label: String,
    /// 响应体中的位置，点路径或JSON Pointer
    pub path: String,
    /// 声明类型
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// 枚举值映射
    #[serde(default)]
    pub enum_mapping: Option<Vec<EnumMapping>>,
    /// 是否作为表格列显示
    #[serde(default = "default_true")]
    pub display_in_table: bool,
    /// 显示格式，例如 `{value} JPY`
    #[serde(default)]
    pub display_format: Option<String>,
}

impl ApiFieldDefinition {
    pub fn new(label: impl Into<String>, path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            field_type,
            enum_mapping: None,
            display_in_table: true,
            display_format: None,
        }
    }

    pub fn with_enum_mapping(mut self, mapping: Vec<EnumMapping>) -> Self {
        self.enum_mapping = Some(mapping);
        self
    }

    pub fn with_display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = Some(format.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display_in_table = false;
        self
    }

    /// 将原始值规范化为该字段的声明类型
    pub fn normalize(&self, raw: Option<&Value>) -> NormalizedValue {
        normalize(raw, self.field_type, self.enum_mapping.as_deref())
    }
}

/// API定义
///
/// 描述一个API的端点、方法、超时和响应字段。批次运行期间不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApiDefinition {
    /// 唯一ID
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    /// 显示名
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// URL模板，可包含 `{name}` 形式的参数
    pub url_template: String,
    /// URL模板参数
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub method: HttpMethod,
    /// 超时时间（秒）
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(exclusive_min = 0.0, message = "timeout_seconds must be positive"))]
    pub timeout_seconds: f64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// JSON请求体，GET/HEAD 以外的方法才会发送
    #[serde(default)]
    pub body: Option<Value>,
    /// 响应字段，按声明顺序
    #[serde(default)]
    pub fields: Vec<ApiFieldDefinition>,
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> f64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl ApiDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url_template: url_template.into(),
            params: BTreeMap::new(),
            method: HttpMethod::Get,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            enabled: true,
            body: None,
            fields: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: f64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_field(mut self, field: ApiFieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 超时时间，非法值退回默认值
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn field(&self, label: &str) -> Option<&ApiFieldDefinition> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// 解析URL模板
    ///
    /// 用 `params` 替换所有 `{name}` 占位符，并验证结果是有效的 http/https 地址
    pub fn resolve_url(&self) -> Result<String, ConfigurationError> {
        if let Some(missing) = TEMPLATE_PARAM
            .captures_iter(&self.url_template)
            .filter_map(|c| c.get(1))
            .find(|name| !self.params.contains_key(name.as_str()))
        {
            return Err(ConfigurationError::UnresolvedTemplateParameter {
                api_id: self.id.clone(),
                parameter: missing.as_str().to_string(),
            });
        }

        let resolved = TEMPLATE_PARAM
            .replace_all(&self.url_template, |caps: &regex::Captures| {
                self.params
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned();

        validators::validate_url(&self.id, &resolved)?;
        Ok(resolved)
    }

    /// 检查定义是否可以执行
    ///
    /// 包括声明式约束、标签唯一性以及URL解析，成功时返回解析后的URL
    pub fn ensure_valid(&self) -> Result<String, ConfigurationError> {
        Validate::validate(self).map_err(|e| ConfigurationError::InvalidDefinition {
            id: self.id.clone(),
            reason: e.to_string(),
        })?;

        if !self.timeout_seconds.is_finite() {
            return Err(ConfigurationError::InvalidDefinition {
                id: self.id.clone(),
                reason: "timeout_seconds must be finite".to_string(),
            });
        }

        let mut labels = HashSet::new();
        for field in &self.fields {
            if !labels.insert(field.label.as_str()) {
                return Err(ConfigurationError::DuplicateLabel {
                    api_id: self.id.clone(),
                    label: field.label.clone(),
                });
            }
        }

        self.resolve_url()
    }

    /// 按字段路径从响应体中提取原始值
    ///
    /// 路径不存在时该标签对应 `None`，而不是错误
    pub fn extract_fields<'a>(&'a self, body: &'a Value) -> BTreeMap<&'a str, Option<&'a Value>> {
        self.fields
            .iter()
            .map(|f| (f.label.as_str(), json_path::resolve(body, &f.path)))
            .collect()
    }

    /// 提取并规范化所有字段
    ///
    /// `body` 为 `None`（无响应体或无法解析）时所有字段均为 `Absent`
    pub fn normalize_fields(&self, body: Option<&Value>) -> BTreeMap<String, NormalizedValue> {
        let raw = body.map(|b| self.extract_fields(b));
        self.fields
            .iter()
            .map(|f| {
                let value = raw
                    .as_ref()
                    .and_then(|r| r.get(f.label.as_str()).copied().flatten());
                (f.label.clone(), f.normalize(value))
            })
            .collect()
    }

    /// 所有字段均为 `Absent` 的提取结果
    pub fn absent_fields(&self) -> BTreeMap<String, NormalizedValue> {
        self.normalize_fields(None)
    }
}

#[cfg(test)]
#[path = "api_definition_test.rs"]
mod tests;
