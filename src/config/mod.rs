// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理HTTP客户端、执行器以及API定义列表的配置设置
pub mod settings;
