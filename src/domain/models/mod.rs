// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod api_definition;
pub mod execution_outcome;
pub mod field_type;
pub mod normalized_value;
