// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 问答请求体 `{"message": "..."}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractRequestDto {
    pub message: String,
}
