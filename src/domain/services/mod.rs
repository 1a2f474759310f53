// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod definition_registry;
pub mod field_merger;
pub mod result_projection;
