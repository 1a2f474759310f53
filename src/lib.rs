// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含API定义、执行结果、类型规范化以及字段合并与投影
pub mod domain;

/// 引擎模块
///
/// 实现HTTP传输引擎
pub mod engines;

/// 执行模块
///
/// 单个API调用和并发批次执行
pub mod execution;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
