// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型
///
/// 字段类型、规范化值、API定义和执行结果
pub mod models;

/// 领域服务
///
/// 字段合并、结果投影和定义注册表
pub mod services;
