// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user_query::UserQuery;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 用户提问仓库特质
#[async_trait]
pub trait UserQueryRepository: Send + Sync {
    /// 记录一条用户提问
    async fn save(&self, query_text: &str) -> Result<UserQuery, RepositoryError>;
}
