// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 执行模块
///
/// 单个API调用、并发批次执行以及协作式取消
pub mod api_client;
pub mod api_executor;
pub mod cancellation;

#[cfg(test)]
pub(crate) mod fake_engine;
