// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 用户提问记录
///
/// Web 层在调用问答服务之前写入，问答服务本身不持久化问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub id: i32,
    pub query_text: String,
}
